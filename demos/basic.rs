use knowledge_search::{
    BuildError, KnowledgeItem, MemoryKnowledgeBase, SearchEngine, SearchOptions,
};

fn main() -> Result<(), BuildError> {
    // build a small knowledge base
    let mut kb = MemoryKnowledgeBase::new();
    kb.insert(KnowledgeItem {
        id: "caching".to_string(),
        title: "caching strategies".to_string(),
        content: "LRU and LFU eviction policies for in-memory caches".to_string(),
        kind: "guide".to_string(),
        category: "systems".to_string(),
        tags: vec!["cache".to_string(), "eviction".to_string()],
    });
    kb.insert(KnowledgeItem {
        id: "retries".to_string(),
        title: "network retries".to_string(),
        content: "exponential backoff with jitter for transient failures".to_string(),
        kind: "guide".to_string(),
        category: "networking".to_string(),
        tags: vec!["network".to_string(), "retry".to_string()],
    });
    kb.insert(KnowledgeItem {
        id: "warming".to_string(),
        title: "cache warming".to_string(),
        content: "prefill caches before shifting traffic".to_string(),
        kind: "note".to_string(),
        category: "systems".to_string(),
        tags: vec!["cache".to_string()],
    });

    // index it and run the three query operations
    let engine = SearchEngine::new(&kb)?;

    let hits = engine.search("cache eviction", &SearchOptions::default());
    println!("search results:\n{hits}");

    let similar = engine.recommend("caching", 5);
    println!("similar to \"caching\":\n{similar}");

    for entry in engine.popular(10) {
        println!("{}: {} tags ({})", entry.id, entry.tag_count, entry.title);
    }

    Ok(())
}
