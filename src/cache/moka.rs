use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use super::LinkCache;
use crate::storage::ShortLink;

pub struct MokaLinkCache {
    inner: Cache<String, ShortLink>,
}

impl MokaLinkCache {
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaLinkCache initialized with max capacity: {}, TTL: {}s",
            max_capacity, ttl_secs
        );
        Self { inner }
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get(&self, slug: &str) -> Option<ShortLink> {
        self.inner.get(slug).await
    }

    async fn insert(&self, link: ShortLink) {
        self.inner.insert(link.slug.clone(), link).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_link(slug: &str) -> ShortLink {
        ShortLink::new(slug.to_string(), "https://example.com".to_string())
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let cache = MokaLinkCache::new(100, 60);
        assert!(cache.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = MokaLinkCache::new(100, 60);
        cache.insert(create_test_link("abc123")).await;

        let hit = cache.get("abc123").await.unwrap();
        assert_eq!(hit.slug, "abc123");
        assert_eq!(hit.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_entries_keyed_by_slug() {
        let cache = MokaLinkCache::new(100, 60);
        cache.insert(create_test_link("one")).await;
        cache.insert(create_test_link("two")).await;

        assert_eq!(cache.get("one").await.unwrap().slug, "one");
        assert_eq!(cache.get("two").await.unwrap().slug, "two");
        assert!(cache.get("three").await.is_none());
    }
}
