use std::collections::HashMap;

/// Generated title and body for one cluster's story set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub body: String,
}

/// Cache key for a cluster summary. Story ids are sorted before joining so
/// identical story membership in any input order hits the same entry.
pub fn summary_cache_key(search_id: &str, cluster_id: u32, story_ids: &[String]) -> String {
    let mut sorted = story_ids.to_vec();
    sorted.sort_unstable();
    format!("{search_id}:{cluster_id}:{}", sorted.join(","))
}

/// In-memory summary store keyed by [`summary_cache_key`]. Failed fetches
/// are never inserted, so a retry always goes back to the service.
#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: HashMap<String, Summary>,
}

impl SummaryCache {
    pub fn get(&self, key: &str) -> Option<&Summary> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, summary: Summary) {
        self.entries.insert(key, summary);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_insensitive() {
        let forward = summary_cache_key("s1", 3, &["a".into(), "b".into(), "c".into()]);
        let shuffled = summary_cache_key("s1", 3, &["c".into(), "a".into(), "b".into()]);
        assert_eq!(forward, shuffled);
        assert_eq!(forward, "s1:3:a,b,c");
    }

    #[test]
    fn key_separates_searches_and_clusters() {
        let ids = vec!["a".to_owned()];
        assert_ne!(
            summary_cache_key("s1", 3, &ids),
            summary_cache_key("s2", 3, &ids)
        );
        assert_ne!(
            summary_cache_key("s1", 3, &ids),
            summary_cache_key("s1", 4, &ids)
        );
    }
}
