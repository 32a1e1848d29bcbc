/// This crate is a semantic search engine for knowledge bases, ranking items
/// against free-text queries with TF-IDF weighting and cosine similarity.
pub mod error;
pub mod knowledge;
pub mod searcher;

/// Search Engine
/// The top-level struct of this crate, providing the public query surface.
/// It is built once over a knowledge-base snapshot and holds an immutable
/// term-document index behind a shared reference.
///
/// Operations:
/// - `search`: rank all indexed items against a free-text query
/// - `recommend`: rank items similar to an already-indexed item
/// - `popular`: order items by tag count
///
/// All three are read-only and safe for concurrent callers. A rebuild
/// constructs a complete new index and publishes it with a single reference
/// swap, so readers never observe a partially populated index.
pub use searcher::SearchEngine;

/// Term-Document Index
/// Holds the document table, the per-term postings (term → document id →
/// raw frequency) and the IDF table derived from one knowledge-base
/// snapshot. Immutable once built; a rebuild produces a wholly new value.
///
/// # Serialization
/// Supported, including a compact CBOR snapshot round-trip
/// (`to_snapshot_bytes` / `from_snapshot_bytes`).
pub use searcher::index::{DocumentRecord, SearchIndex};

/// Term Frequency structure
/// Insertion-ordered term → occurrence-count map for a single document or
/// query. Used as the base data for TF-IDF vector construction.
pub use searcher::term::TermFrequency;

/// Tokenizer
/// Normalizes free text into ordered lowercase terms: split on whitespace
/// and a fixed punctuation set, keep tokens longer than two characters.
/// Deterministic and side-effect free.
pub use searcher::tokenizer::tokenize;

/// Term vector and similarity primitives
/// `TermVector` maps terms to TF-IDF weights; `cosine_similarity` compares
/// two vectors and always lands in [0, 1], returning exactly 0.0 when either
/// norm is zero.
pub use searcher::scoring::cosine_similarity;
pub use searcher::vector::TermVector;

/// Search results and options
/// - `SearchOptions`: limit / threshold / type / category knobs with
///   documented defaults, clamped at the boundary
/// - `Hits`: ordered list of scored results with a readable `Display`
/// - `SearchHit`: one scored result entry
/// - `PopularHit`: one entry of the tag-count ranking
pub use searcher::scoring::{Hits, PopularHit, SearchHit, SearchOptions};

/// Knowledge base interface
/// The external store this engine indexes but does not own. `id_list` and
/// `get` are read once per index build; item absence is `Ok(None)`, backend
/// failure is `Err(KbError)`. `MemoryKnowledgeBase` is an insertion-ordered
/// in-memory implementation.
pub use knowledge::{KnowledgeBase, KnowledgeItem, MemoryKnowledgeBase};

/// Error taxonomy
/// Construction is the only fallible surface: `BuildError` wraps backend
/// failures and snapshot codec failures. Query operations degrade to empty
/// results instead of erroring.
pub use error::{BuildError, KbError};
