use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BuildError;
use crate::knowledge::{KnowledgeBase, KnowledgeItem};

use super::term::TermFrequency;
use super::tokenizer::tokenize;

/// Searchable projection of one knowledge item.
///
/// Built once per index build and never mutated in place; a rebuild replaces
/// the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Total number of terms the document produced during tokenization.
    pub term_count: usize,
}

/// Immutable term-document index over one knowledge-base snapshot.
///
/// Holds the document table (in knowledge-base id order), the postings
/// (term → document id → raw term frequency) and the IDF table
/// (`ln(total_docs / (1 + document_frequency))`). All three are derived in
/// one build pass and fixed for the index's lifetime; a rebuild constructs a
/// wholly new value, so shared references never observe partial state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub(crate) documents: IndexMap<String, DocumentRecord>,
    pub(crate) postings: IndexMap<String, IndexMap<String, u32>>,
    pub(crate) idf: IndexMap<String, f64>,
}

impl SearchIndex {
    /// Build an index from the current contents of a knowledge base.
    ///
    /// Reads `id_list()` once and resolves every id; ids the store no longer
    /// knows are skipped, while a backend error aborts the build. Each item
    /// is indexed over the concatenation of its title and content.
    /// Tokenizing and counting fan out across rayon workers; the merge into
    /// postings stays sequential in id-list order, so two builds over the
    /// same snapshot produce bit-identical postings and IDF tables.
    ///
    /// An empty knowledge base yields an empty index: queries against it
    /// return empty results, never an error.
    pub fn build(kb: &impl KnowledgeBase) -> Result<Self, BuildError> {
        let ids = kb.id_list()?;
        let mut items: Vec<KnowledgeItem> = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(item) = kb.get(id)? {
                items.push(item);
            }
        }

        let counted: Vec<(KnowledgeItem, TermFrequency)> = items
            .into_par_iter()
            .map(|item| {
                let terms = tokenize(&format!("{} {}", item.title, item.content));
                let freq = TermFrequency::from_terms(&terms);
                (item, freq)
            })
            .collect();

        let mut index = SearchIndex::default();
        for (item, freq) in counted {
            for (term, count) in freq.iter() {
                index
                    .postings
                    .entry(term.to_string())
                    .or_default()
                    .insert(item.id.clone(), count);
            }
            let record = DocumentRecord {
                id: item.id.clone(),
                title: item.title,
                kind: item.kind,
                category: item.category,
                tags: item.tags,
                term_count: freq.total() as usize,
            };
            index.documents.insert(item.id, record);
        }

        let total_docs = index.documents.len() as f64;
        for (term, posting) in &index.postings {
            let document_frequency = posting.len() as f64;
            index
                .idf
                .insert(term.clone(), (total_docs / (1.0 + document_frequency)).ln());
        }

        debug!(
            documents = index.documents.len(),
            vocabulary = index.postings.len(),
            "search index built"
        );
        Ok(index)
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct terms across the corpus.
    pub fn vocab_size(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up one document record by id.
    pub fn document(&self, id: &str) -> Option<&DocumentRecord> {
        self.documents.get(id)
    }

    /// All document records, in knowledge-base id order.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.values()
    }

    /// IDF weight of a term; `None` for terms the corpus never produced.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Raw frequency of a term within one document; 0 when absent.
    pub fn term_frequency(&self, term: &str, id: &str) -> u32 {
        self.postings
            .get(term)
            .and_then(|posting| posting.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct documents containing a term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, IndexMap::len)
    }
}

/// Snapshot (de)serialization.
impl SearchIndex {
    /// Encode the full index as a compact CBOR snapshot.
    ///
    /// The snapshot is a convenience, not a storage contract: an index can
    /// always be rebuilt in memory from the knowledge base instead.
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, BuildError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Decode an index from a snapshot produced by [`Self::to_snapshot_bytes`].
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, BuildError> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}
