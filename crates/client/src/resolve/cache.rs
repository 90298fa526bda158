//! In-memory cache of resolution service answers.
//!
//! Keyed by `(url, index)`. Unbounded and process-lifetime unless a TTL or an
//! entry cap is configured. There is no in-flight de-duplication: callers that
//! miss concurrently each hit the service, and the last answer stored wins.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::Resolution;

type CacheKey = (String, Option<u32>);

/// Cached resolution with timestamp.
#[derive(Debug)]
struct CachedResolution {
    resolution: Resolution,
    inserted_at: Instant,
}

impl CachedResolution {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.inserted_at.elapsed() > ttl)
    }
}

/// Cache of resolution results shared by every facade call.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<CacheKey, CachedResolution>>,
    ttl: Option<Duration>,
    max_entries: Option<usize>,
}

impl ResolutionCache {
    /// Cache with no TTL and no size limit.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cache that ignores entries older than `ttl` and keeps at most `max_entries`.
    pub fn new(ttl: Option<Duration>, max_entries: Option<usize>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), ttl, max_entries }
    }

    /// Look up a live entry.
    pub async fn get(&self, url: &str, index: Option<u32>) -> Option<Resolution> {
        let entries = self.entries.read().await;
        let cached = entries.get(&(url.to_string(), index))?;

        if cached.is_expired(self.ttl) {
            tracing::debug!("resolution cache entry expired for {}|{:?}", url, index);
            return None;
        }

        Some(cached.resolution.clone())
    }

    /// Store a resolution, evicting the oldest entry when the cache is full.
    pub async fn insert(&self, url: &str, index: Option<u32>, resolution: Resolution) {
        let key = (url.to_string(), index);
        let mut entries = self.entries.write().await;

        if let Some(max) = self.max_entries
            && !entries.contains_key(&key)
            && entries.len() >= max
        {
            let oldest = entries
                .iter()
                .min_by_key(|(_, cached)| cached.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!("resolution cache full, evicting {}|{:?}", oldest.0, oldest.1);
                entries.remove(&oldest);
            }
        }

        entries.insert(key, CachedResolution { resolution, inserted_at: Instant::now() });
    }

    /// Drop expired entries. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, cached| !cached.is_expired(self.ttl));
        before - entries.len()
    }

    /// Drop every entry. Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(origin: &str) -> Resolution {
        Resolution { origin: origin.to_string(), meta: None }
    }

    #[tokio::test]
    async fn test_get_miss_then_hit() {
        let cache = ResolutionCache::unbounded();
        assert!(cache.get("https://x/a.png", None).await.is_none());

        cache.insert("https://x/a.png", None, resolution("https://cdn/a.png")).await;
        let hit = cache.get("https://x/a.png", None).await.unwrap();
        assert_eq!(hit.origin, "https://cdn/a.png");
    }

    #[tokio::test]
    async fn test_index_is_part_of_key() {
        let cache = ResolutionCache::unbounded();
        cache.insert("https://x/doc.pdf", Some(1), resolution("https://cdn/doc.pdf#1")).await;

        assert!(cache.get("https://x/doc.pdf", None).await.is_none());
        assert!(cache.get("https://x/doc.pdf", Some(2)).await.is_none());
        assert!(cache.get("https://x/doc.pdf", Some(1)).await.is_some());
    }

    #[tokio::test]
    async fn test_same_key_keeps_one_entry() {
        let cache = ResolutionCache::unbounded();
        cache.insert("https://x/a", None, resolution("first")).await;
        cache.insert("https://x/a", None, resolution("second")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("https://x/a", None).await.unwrap().origin, "second");
    }

    #[tokio::test]
    async fn test_expired_entry_not_served() {
        let ttl = Duration::from_secs(60);
        let cache = ResolutionCache::new(Some(ttl), None);
        cache.entries.write().await.insert(
            ("https://x/a".to_string(), None),
            CachedResolution {
                resolution: resolution("stale"),
                inserted_at: Instant::now() - ttl - Duration::from_secs(1),
            },
        );

        assert!(cache.get("https://x/a", None).await.is_none());
        assert_eq!(cache.cleanup_expired().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_unbounded_never_expires() {
        let cache = ResolutionCache::unbounded();
        cache.entries.write().await.insert(
            ("https://x/a".to_string(), None),
            CachedResolution {
                resolution: resolution("old"),
                inserted_at: Instant::now() - Duration::from_secs(7 * 24 * 60 * 60),
            },
        );

        assert!(cache.get("https://x/a", None).await.is_some());
        assert_eq!(cache.cleanup_expired().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = ResolutionCache::new(None, Some(2));
        {
            let mut entries = cache.entries.write().await;
            entries.insert(
                ("https://x/old".to_string(), None),
                CachedResolution { resolution: resolution("old"), inserted_at: Instant::now() - Duration::from_secs(10) },
            );
            entries.insert(
                ("https://x/mid".to_string(), None),
                CachedResolution { resolution: resolution("mid"), inserted_at: Instant::now() - Duration::from_secs(5) },
            );
        }

        cache.insert("https://x/new", None, resolution("new")).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("https://x/old", None).await.is_none());
        assert!(cache.get("https://x/mid", None).await.is_some());
        assert!(cache.get("https://x/new", None).await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = ResolutionCache::unbounded();
        cache.insert("https://x/a", None, resolution("a")).await;
        cache.insert("https://x/b", Some(0), resolution("b")).await;

        assert_eq!(cache.clear().await, 2);
        assert!(cache.is_empty().await);
    }
}
