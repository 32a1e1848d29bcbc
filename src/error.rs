use thiserror::Error;

/// Failure reported by a [`KnowledgeBase`](crate::KnowledgeBase) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("knowledge base access failed: {message}")]
pub struct KbError {
    message: String,
}

impl KbError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fatal error raised while constructing a search index.
///
/// Query operations never return this: an unknown item id or an empty corpus
/// degrades to an empty result, not an error.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The knowledge base accessor failed while the index was being read.
    #[error("knowledge base unavailable")]
    KnowledgeBase(#[from] KbError),
    /// An index snapshot could not be encoded or decoded.
    #[error("index snapshot codec failed")]
    Snapshot(#[from] serde_cbor::Error),
}
