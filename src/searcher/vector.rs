use indexmap::IndexMap;

use super::index::SearchIndex;
use super::term::TermFrequency;
use super::tokenizer::tokenize;

/// Sparse term-weight vector for one document or query.
///
/// Ephemeral and owned by the caller; the index never stores one. Keys keep
/// first-occurrence order so identical input produces an identical vector.
pub type TermVector = IndexMap<String, f64>;

impl SearchIndex {
    /// Build the TF-IDF vector for a free-text query.
    ///
    /// Raw query frequencies are rescaled with augmented TF
    /// (`0.5 + 0.5 · tf / max_tf`) so a single repeated term cannot dominate,
    /// then weighted by IDF. Terms the index has never seen stay in the
    /// vector at weight zero: they cannot move the dot product but keep the
    /// query's term set intact. An empty query yields an empty vector.
    pub fn query_vector(&self, text: &str) -> TermVector {
        let freq = TermFrequency::from_terms(&tokenize(text));
        let mut vector = TermVector::new();
        let max_tf = freq.max_count();
        if max_tf == 0 {
            return vector;
        }
        for (term, count) in freq.iter() {
            let scaled_tf = 0.5 + 0.5 * (f64::from(count) / f64::from(max_tf));
            let idf = self.idf(term).unwrap_or(0.0);
            vector.insert(term.to_string(), scaled_tf * idf);
        }
        vector
    }

    /// Build the TF-IDF vector for an indexed document.
    ///
    /// Document weights are raw term frequency × IDF with no TF rescaling.
    /// The asymmetry against [`Self::query_vector`] is deliberate: it biases
    /// scoring toward documents whose term emphasis matches the query without
    /// over-penalizing long documents. Treat it as a tunable, not a validated
    /// optimum.
    ///
    /// Unknown document ids yield an empty vector.
    pub fn doc_vector(&self, id: &str) -> TermVector {
        let mut vector = TermVector::new();
        for (term, posting) in &self.postings {
            if let Some(&tf) = posting.get(id) {
                let idf = self.idf(term).unwrap_or(0.0);
                vector.insert(term.clone(), f64::from(tf) * idf);
            }
        }
        vector
    }
}
