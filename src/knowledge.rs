use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::KbError;

/// A single entry of the external knowledge store.
///
/// The engine treats items as read-only input: it projects them into
/// [`DocumentRecord`](crate::DocumentRecord)s at index build and never writes
/// back. `kind` is serialized as `type` to match the store's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Read-only accessor for the knowledge store backing an index build.
///
/// Both methods are called exactly once per id during
/// [`SearchIndex::build`](crate::SearchIndex::build): `id_list` first, then
/// `get` for every returned id. An id that resolves to `Ok(None)` is skipped;
/// an `Err` aborts the build.
pub trait KnowledgeBase {
    /// Ordered ids of every item in the store.
    fn id_list(&self) -> Result<Vec<String>, KbError>;

    /// Resolve a single id. `Ok(None)` means the id is unknown.
    fn get(&self, id: &str) -> Result<Option<KnowledgeItem>, KbError>;
}

/// Insertion-ordered in-memory knowledge base.
///
/// The id list comes back in insertion order, which makes index builds over
/// it fully deterministic. Backs the tests, the demo and the bench, and
/// serves as the reference implementation of the ordered-id-list contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryKnowledgeBase {
    items: IndexMap<String, KnowledgeItem>,
}

impl MemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item keyed by its id, replacing any previous entry.
    pub fn insert(&mut self, item: KnowledgeItem) -> Option<KnowledgeItem> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KnowledgeBase for MemoryKnowledgeBase {
    fn id_list(&self) -> Result<Vec<String>, KbError> {
        Ok(self.items.keys().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<KnowledgeItem>, KbError> {
        Ok(self.items.get(id).cloned())
    }
}
