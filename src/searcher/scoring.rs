use std::fmt;

use serde::{Deserialize, Serialize};

use super::vector::TermVector;

/// Default maximum number of search hits.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Default minimum similarity for a document to count as a hit.
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.1;

/// Cosine similarity of two term vectors.
///
/// Dot product over the union of both vectors' terms, divided by the product
/// of their Euclidean norms. A zero norm on either side yields exactly 0.0,
/// never NaN. The result is clamped into [0, 1]: corpus-wide terms can carry
/// a negative IDF, and the clamp is how the bound invariant is enforced for
/// the vectors this engine produces.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    for (term, &weight_a) in a {
        norm_a += weight_a * weight_a;
        if let Some(&weight_b) = b.get(term) {
            dot += weight_a * weight_b;
        }
    }
    let norm_b: f64 = b.values().map(|weight| weight * weight).sum();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Knobs for [`SearchEngine::search`](crate::SearchEngine::search).
///
/// Every field has a documented default; out-of-range values are clamped at
/// the boundary instead of rejected, preserving the no-error contract of the
/// query surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of hits to return. Default 10.
    pub limit: usize,
    /// Minimum similarity for a document to be included, in [0, 1].
    /// Default 0.1.
    pub threshold: f64,
    /// Exact-match filter on the document `type` tag.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Exact-match filter on the document category.
    pub category: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            threshold: DEFAULT_SEARCH_THRESHOLD,
            kind: None,
            category: None,
        }
    }
}

impl SearchOptions {
    /// Copy with out-of-range fields forced back into their valid ranges.
    /// The threshold lands in [0, 1] with NaN treated as 0.0; `limit` is
    /// unsigned, so its lower bound holds by construction.
    pub(crate) fn clamped(&self) -> Self {
        let mut options = self.clone();
        options.threshold = if options.threshold.is_nan() {
            0.0
        } else {
            options.threshold.clamp(0.0, 1.0)
        };
        options
    }
}

/// One scored search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub score: f64,
    pub tags: Vec<String>,
}

/// Ordered collection of search hits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    pub list: Vec<SearchHit>,
}

impl Hits {
    pub fn new(list: Vec<SearchHit>) -> Self {
        Self { list }
    }

    /// Sort by descending score. The sort is stable, so equal scores keep
    /// their existing (insertion) order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchHit> {
        self.list.iter()
    }

    pub fn into_vec(self) -> Vec<SearchHit> {
        self.list
    }
}

impl IntoIterator for Hits {
    type Item = SearchHit;
    type IntoIter = std::vec::IntoIter<SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl fmt::Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hits [")?;
        for hit in &self.list {
            writeln!(f, "    {}: {:.6} ({})", hit.id, hit.score, hit.title)?;
        }
        write!(f, "]")
    }
}

/// One entry of the tag-count popularity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularHit {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    /// Number of tags on the item. An importance proxy with no usage signal
    /// behind it.
    pub tag_count: usize,
}
