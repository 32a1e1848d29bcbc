pub mod index;
pub mod scoring;
pub mod term;
pub mod tokenizer;
pub mod vector;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::trace;

use crate::error::BuildError;
use crate::knowledge::KnowledgeBase;

use self::index::{DocumentRecord, SearchIndex};
use self::scoring::{cosine_similarity, Hits, PopularHit, SearchHit, SearchOptions};

/// Default number of recommendations returned for an item.
pub const DEFAULT_RECOMMEND_LIMIT: usize = 5;
/// Default number of entries in the popularity ranking.
pub const DEFAULT_POPULAR_LIMIT: usize = 10;
/// Similarity floor used when an item is expanded into a recommendation
/// query; lower than the search default so near neighbors survive.
const RECOMMEND_THRESHOLD: f64 = 0.05;

/// TF-IDF search engine over one knowledge-base snapshot.
///
/// Holds an immutable [`SearchIndex`] behind a shared reference. All query
/// operations are read-only and safe for concurrent callers; none of them
/// return an error for well-formed input — absent items and empty corpora
/// degrade to empty results.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: Arc<SearchIndex>,
}

impl SearchEngine {
    /// Build an engine over the current contents of the knowledge base.
    ///
    /// This is the engine's only fallible entry point besides snapshot
    /// decoding: a backend failure during the build propagates as
    /// [`BuildError`].
    pub fn new(kb: &impl KnowledgeBase) -> Result<Self, BuildError> {
        Ok(Self {
            index: Arc::new(SearchIndex::build(kb)?),
        })
    }

    /// Wrap an already-built index, e.g. one decoded from a snapshot.
    pub fn from_index(index: SearchIndex) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    /// Re-index the knowledge base and publish the result atomically.
    ///
    /// The new index is built to completion before a single reference swap
    /// publishes it. Readers holding the previous handle keep a complete,
    /// self-consistent snapshot; nobody ever observes a partially populated
    /// index. On error the current index stays in place.
    pub fn rebuild(&mut self, kb: &impl KnowledgeBase) -> Result<(), BuildError> {
        let next = SearchIndex::build(kb)?;
        self.index = Arc::new(next);
        Ok(())
    }

    /// Shared handle to the live index.
    pub fn index(&self) -> Arc<SearchIndex> {
        Arc::clone(&self.index)
    }

    /// Rank every indexed item against a free-text query.
    ///
    /// Builds the query vector once, scores each document with cosine
    /// similarity (fanned out across rayon workers, reduced in document
    /// order), keeps hits at or above the threshold that pass both optional
    /// exact-match filters, sorts by descending score with insertion order
    /// breaking ties, and truncates to the limit.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Hits {
        let options = options.clamped();
        let query_vector = self.index.query_vector(query);

        let records: Vec<&DocumentRecord> = self.index.documents().collect();
        let list: Vec<SearchHit> = records
            .into_par_iter()
            .filter_map(|doc| {
                let score = cosine_similarity(&query_vector, &self.index.doc_vector(&doc.id));
                if score < options.threshold {
                    return None;
                }
                if let Some(kind) = &options.kind {
                    if *kind != doc.kind {
                        return None;
                    }
                }
                if let Some(category) = &options.category {
                    if *category != doc.category {
                        return None;
                    }
                }
                Some(SearchHit {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    kind: doc.kind.clone(),
                    category: doc.category.clone(),
                    score,
                    tags: doc.tags.clone(),
                })
            })
            .collect();

        let mut hits = Hits::new(list);
        hits.sort_by_score();
        hits.list.truncate(options.limit);
        trace!(query, hits = hits.len(), "search evaluated");
        hits
    }

    /// Rank items similar to an already-indexed item.
    ///
    /// The item is expanded into a synthetic query from its title and tags,
    /// searched with a lowered threshold and `limit + 1` slots, and then
    /// removed from its own results; the padding keeps `limit` survivors
    /// whenever enough similar documents exist. An id the index does not
    /// know yields empty hits, not an error.
    pub fn recommend(&self, item_id: &str, limit: usize) -> Hits {
        let Some(doc) = self.index.document(item_id) else {
            return Hits::default();
        };
        let query = format!("{} {}", doc.title, doc.tags.join(" "));
        let options = SearchOptions {
            limit: limit.saturating_add(1),
            threshold: RECOMMEND_THRESHOLD,
            kind: None,
            category: None,
        };
        let mut hits = self.search(&query, &options);
        hits.list.retain(|hit| hit.id != item_id);
        hits.list.truncate(limit);
        hits
    }

    /// Order all indexed items by descending tag count.
    ///
    /// Tag count is the importance proxy the source data model carries; it
    /// reflects no usage signal. Ties keep knowledge-base insertion order.
    pub fn popular(&self, limit: usize) -> Vec<PopularHit> {
        let mut entries: Vec<PopularHit> = self
            .index
            .documents()
            .map(|doc| PopularHit {
                id: doc.id.clone(),
                title: doc.title.clone(),
                kind: doc.kind.clone(),
                category: doc.category.clone(),
                tag_count: doc.tags.len(),
            })
            .collect();
        entries.sort_by(|a, b| b.tag_count.cmp(&a.tag_count));
        entries.truncate(limit);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{KnowledgeItem, MemoryKnowledgeBase};

    fn item(
        id: &str,
        title: &str,
        content: &str,
        kind: &str,
        category: &str,
        tags: &[&str],
    ) -> KnowledgeItem {
        KnowledgeItem {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            kind: kind.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    /// Five items: three cache-related notes sharing the "cache" term and
    /// tag, two unrelated ones.
    fn cache_kb() -> MemoryKnowledgeBase {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert(item(
            "a",
            "cache basics",
            "cache layers",
            "guide",
            "systems",
            &["cache"],
        ));
        kb.insert(item(
            "b",
            "cache tuning",
            "cache sizes",
            "guide",
            "systems",
            &["cache"],
        ));
        kb.insert(item(
            "c",
            "cache pitfalls",
            "cache mistakes",
            "note",
            "systems",
            &["cache"],
        ));
        kb.insert(item(
            "d",
            "network retries",
            "exponential backoff",
            "guide",
            "networking",
            &[],
        ));
        kb.insert(item(
            "e",
            "prompt notes",
            "prompt structure",
            "note",
            "writing",
            &[],
        ));
        kb
    }

    fn engine() -> SearchEngine {
        SearchEngine::new(&cache_kb()).unwrap()
    }

    fn hit_ids(hits: &Hits) -> Vec<&str> {
        hits.iter().map(|hit| hit.id.as_str()).collect()
    }

    #[test]
    fn search_ranks_matching_documents() {
        let engine = engine();
        let hits = engine.search("cache", &SearchOptions::default());
        assert_eq!(hit_ids(&hits), vec!["a", "b", "c"]);
        for hit in hits.iter() {
            assert!(hit.score > 0.0 && hit.score <= 1.0);
        }
    }

    #[test]
    fn search_scores_tie_break_on_insertion_order() {
        let engine = engine();
        // a, b and c are symmetric around "cache": two occurrences each plus
        // two single-occurrence private terms, so their scores tie exactly.
        let hits = engine.search("cache", &SearchOptions::default());
        assert_eq!(hits.list[0].score, hits.list[1].score);
        assert_eq!(hit_ids(&hits), vec!["a", "b", "c"]);
    }

    #[test]
    fn search_respects_limit() {
        let engine = engine();
        let options = SearchOptions {
            limit: 2,
            ..SearchOptions::default()
        };
        let hits = engine.search("cache", &options);
        assert_eq!(hit_ids(&hits), vec!["a", "b"]);

        let options = SearchOptions {
            limit: 0,
            ..SearchOptions::default()
        };
        assert!(engine.search("cache", &options).is_empty());
    }

    #[test]
    fn search_threshold_drops_weak_matches() {
        let engine = engine();
        let options = SearchOptions {
            threshold: 1.0,
            ..SearchOptions::default()
        };
        assert!(engine.search("cache", &options).is_empty());
    }

    #[test]
    fn type_filter_keeps_exact_matches_only() {
        let engine = engine();
        let options = SearchOptions {
            kind: Some("note".to_string()),
            ..SearchOptions::default()
        };
        let hits = engine.search("cache", &options);
        assert_eq!(hit_ids(&hits), vec!["c"]);
        for hit in hits.iter() {
            assert_eq!(hit.kind, "note");
        }

        // Nothing above threshold with a matching type is dropped.
        let options = SearchOptions {
            kind: Some("guide".to_string()),
            ..SearchOptions::default()
        };
        assert_eq!(hit_ids(&engine.search("cache", &options)), vec!["a", "b"]);
    }

    #[test]
    fn category_filter_keeps_exact_matches_only() {
        let engine = engine();
        let options = SearchOptions {
            category: Some("networking".to_string()),
            ..SearchOptions::default()
        };
        // d is the only networking item but shares no query terms.
        assert!(engine.search("cache", &options).is_empty());

        let options = SearchOptions {
            category: Some("systems".to_string()),
            ..SearchOptions::default()
        };
        assert_eq!(
            hit_ids(&engine.search("cache", &options)),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn search_on_empty_corpus_returns_empty() {
        let engine = SearchEngine::new(&MemoryKnowledgeBase::new()).unwrap();
        let hits = engine.search("anything at all", &SearchOptions::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn query_built_from_own_title_scores_self_highest() {
        let engine = engine();
        let options = SearchOptions {
            threshold: 0.0,
            ..SearchOptions::default()
        };
        let hits = engine.search("cache basics cache", &options);
        let self_score = hits.iter().find(|hit| hit.id == "a").unwrap().score;
        let disjoint_score = hits.iter().find(|hit| hit.id == "d").unwrap().score;
        assert!(self_score > disjoint_score);
        assert_eq!(disjoint_score, 0.0);
        assert_eq!(hits.list[0].id, "a");
    }

    #[test]
    fn recommend_excludes_the_item_itself() {
        let engine = engine();
        for id in ["a", "b", "c", "d", "e"] {
            let hits = engine.recommend(id, DEFAULT_RECOMMEND_LIMIT);
            assert!(hits.iter().all(|hit| hit.id != id), "{id} recommended itself");
        }
    }

    #[test]
    fn recommend_returns_similar_items() {
        let engine = engine();
        let hits = engine.recommend("a", 2);
        assert_eq!(hit_ids(&hits), vec!["b", "c"]);
    }

    #[test]
    fn recommend_padding_survives_self_exclusion() {
        let engine = engine();
        // Two similar documents exist besides "a"; asking for exactly two
        // must return both even though "a" itself ranks first internally.
        assert_eq!(engine.recommend("a", 2).len(), 2);
        assert_eq!(engine.recommend("a", 1).len(), 1);
    }

    #[test]
    fn recommend_unknown_id_is_empty_not_an_error() {
        let engine = engine();
        assert!(engine.recommend("missing", 5).is_empty());
    }

    #[test]
    fn popular_orders_by_tag_count_with_insertion_tie_break() {
        let engine = engine();
        let entries = engine.popular(DEFAULT_POPULAR_LIMIT);
        let ids: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
        for pair in entries.windows(2) {
            assert!(pair[0].tag_count >= pair[1].tag_count);
        }
        assert_eq!(engine.popular(1)[0].id, "a");
    }

    #[test]
    fn popular_respects_limit() {
        let engine = engine();
        assert_eq!(engine.popular(3).len(), 3);
        assert!(engine.popular(0).is_empty());
    }

    #[test]
    fn two_engines_over_one_snapshot_agree_exactly() {
        let kb = cache_kb();
        let first = SearchEngine::new(&kb).unwrap();
        let second = SearchEngine::new(&kb).unwrap();
        for query in ["cache", "cache tuning", "network backoff", ""] {
            let a = first.search(query, &SearchOptions::default());
            let b = second.search(query, &SearchOptions::default());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn rebuild_swaps_in_the_new_snapshot() {
        let mut kb = cache_kb();
        let mut engine = SearchEngine::new(&kb).unwrap();
        let before = engine.index();
        assert_eq!(before.doc_count(), 5);

        kb.insert(item(
            "f",
            "cache invalidation",
            "cache naming",
            "note",
            "systems",
            &["cache"],
        ));
        engine.rebuild(&kb).unwrap();

        // The old handle still sees the old snapshot.
        assert_eq!(before.doc_count(), 5);
        assert_eq!(engine.index().doc_count(), 6);
        let hits = engine.search("cache", &SearchOptions::default());
        assert!(hits.iter().any(|hit| hit.id == "f"));
    }

    #[test]
    fn concurrent_searches_share_one_index() {
        let engine = std::sync::Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = std::sync::Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine.search("cache", &SearchOptions::default()).len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
    }

    #[test]
    fn scenario_exclusive_terms_rank_their_document_first() {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert(item(
            "a",
            "caching strategies",
            "LRU and LFU eviction policies for caches",
            "note",
            "general",
            &["cache", "eviction"],
        ));
        kb.insert(item(
            "b",
            "network retries",
            "exponential backoff for transient failures",
            "note",
            "general",
            &["network", "retry"],
        ));
        let engine = SearchEngine::new(&kb).unwrap();
        let options = SearchOptions {
            limit: 5,
            ..SearchOptions::default()
        };
        let hits = engine.search("cache eviction policy", &options);
        let ids = hit_ids(&hits);
        let pos_a = ids.iter().position(|id| *id == "a");
        let pos_b = ids.iter().position(|id| *id == "b");
        match (pos_a, pos_b) {
            // "cache"/"eviction" terms are exclusive to a, so b may only
            // appear behind it — or not at all.
            (Some(a), Some(b)) => assert!(a < b),
            (_, None) => {}
            (None, Some(_)) => panic!("b ranked without a"),
        }
    }

    #[test]
    fn scenario_popularity_tie_returns_first_inserted() {
        let mut kb = MemoryKnowledgeBase::new();
        kb.insert(item(
            "a",
            "caching strategies",
            "LRU and LFU eviction policies for caches",
            "note",
            "general",
            &["cache", "eviction"],
        ));
        kb.insert(item(
            "b",
            "network retries",
            "exponential backoff for transient failures",
            "note",
            "general",
            &["network", "retry"],
        ));
        let engine = SearchEngine::new(&kb).unwrap();
        let top = engine.popular(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, "a");
        assert_eq!(top[0].tag_count, 2);
    }

    #[test]
    fn options_out_of_range_are_clamped_not_rejected() {
        let engine = engine();
        let options = SearchOptions {
            threshold: f64::NAN,
            ..SearchOptions::default()
        };
        // NaN clamps to 0.0: every document passes the threshold.
        let hits = engine.search("cache", &options);
        assert_eq!(hits.len(), 5);

        let options = SearchOptions {
            threshold: 7.5,
            ..SearchOptions::default()
        };
        assert!(engine.search("cache", &options).is_empty());
    }
}
