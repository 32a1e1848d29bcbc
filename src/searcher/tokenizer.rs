/// Characters treated as term separators in addition to whitespace.
const DELIMITERS: &[char] = &[
    ',', '.', ';', ':', '!', '?', '"', '\'', '(', ')', '{', '}', '[', ']', '<', '>', '/', '\\',
    '|', '`', '~', '@', '#', '$', '%', '^', '&', '*', '-', '+', '=',
];

/// Minimum term length in characters. Shorter tokens carry too little signal
/// to be worth indexing.
const MIN_TERM_CHARS: usize = 3;

/// Tokenize free text into ordered lowercase terms.
///
/// Pipeline: lowercase → split on whitespace and the fixed delimiter set →
/// drop empty tokens and tokens shorter than three characters. No stemming
/// and no stop-word list. Identical input always yields the identical
/// sequence in original order.
///
/// # Example
///
/// ```
/// use knowledge_search::tokenize;
///
/// let terms = tokenize("Cache-eviction policies, explained!");
/// assert_eq!(terms, vec!["cache", "eviction", "policies", "explained"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_string)
        .collect()
}
