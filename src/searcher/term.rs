use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Term occurrence counts for a single document or query.
///
/// Counts are kept in first-occurrence order so every structure derived from
/// them (postings, IDF tables, vectors) comes out identical for identical
/// input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    counts: IndexMap<String, u32>,
    total: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every term of an ordered sequence.
    pub fn from_terms<T>(terms: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        freq.add_terms(terms);
        freq
    }

    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        if let Some(count) = self.counts.get_mut(term) {
            *count += 1;
        } else {
            self.counts.insert(term.to_string(), 1);
        }
        self.total += 1;
        self
    }

    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Occurrence count of one term; 0 when absent.
    #[inline]
    pub fn count(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Count of the most frequent term; 0 when no terms were added.
    #[inline]
    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Total occurrences across all terms.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct terms.
    #[inline]
    pub fn unique_terms(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Terms and counts in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(term, &count)| (term.as_str(), count))
    }
}
