//! Concurrent session token cache.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Last known state of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Account the session belongs to.
    pub email: String,

    /// Unix timestamp (seconds) after which the token is rejected upstream.
    pub expiration: i64,

    /// Remaining refresh allowance. Informational only.
    pub refresh_left: u32,
}

impl CacheEntry {
    /// Create a new cache entry.
    pub fn new(email: impl Into<String>, expiration: i64, refresh_left: u32) -> Self {
        Self {
            email: email.into(),
            expiration,
            refresh_left,
        }
    }

    /// The expiration as a UTC timestamp, if it is in range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expiration, 0)
    }
}

/// Shared state behind the cache handle.
#[derive(Default)]
struct CacheInner {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    clears: AtomicU64,
}

/// Best-effort map from session token to session metadata.
///
/// Entries never expire individually. They leave the cache through
/// [`remove`](Self::remove) or when the whole map is emptied by
/// [`clear`](Self::clear), usually from the [`CacheSweeper`](crate::CacheSweeper).
///
/// Cloning is cheap and every clone sees the same map.
#[derive(Clone, Default)]
pub struct SessionCache {
    inner: Arc<CacheInner>,
}

impl SessionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a token. Never blocks on anything but the map lock.
    pub fn try_get(&self, token: &str) -> Option<CacheEntry> {
        let entry = self.inner.entries.read().get(token).cloned();
        if entry.is_some() {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            trace!("Session cache hit");
        } else {
            self.inner.misses.fetch_add(1, Ordering::Relaxed);
            trace!("Session cache miss");
        }
        entry
    }

    /// Insert an entry unless one is already present for `token`.
    ///
    /// Returns `true` if the entry was stored. An existing entry is left untouched.
    pub fn put(&self, token: impl Into<String>, entry: CacheEntry) -> bool {
        let mut entries = self.inner.entries.write();
        match entries.entry(token.into()) {
            Entry::Occupied(_) => {
                trace!("Session already cached, keeping existing entry");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
                trace!(cache_size = entries.len(), "Session inserted into cache");
                true
            }
        }
    }

    /// Remove the entry for `token`, if any.
    pub fn remove(&self, token: &str) -> Option<CacheEntry> {
        let removed = self.inner.entries.write().remove(token);
        if removed.is_some() {
            trace!("Session removed from cache");
        }
        removed
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut entries = self.inner.entries.write();
            let count = entries.len();
            entries.clear();
            count
        };
        self.inner.clears.fetch_add(1, Ordering::Relaxed);
        debug!(removed, "Session cache cleared");
        removed
    }

    /// Check if a token is cached. Does not count as a hit or miss.
    pub fn contains(&self, token: &str) -> bool {
        self.inner.entries.read().contains_key(token)
    }

    /// Number of cached sessions.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            clears: self.inner.clears.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("size", &self.len())
            .finish()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of cached sessions.
    pub size: usize,

    /// Lookups answered from the cache.
    pub hits: u64,

    /// Lookups that found nothing.
    pub misses: u64,

    /// Number of full clears performed.
    pub clears: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(email: &str) -> CacheEntry {
        CacheEntry::new(email, 1_900_000_000, 3)
    }

    #[test]
    fn test_put_and_get() {
        let cache = SessionCache::new();
        assert!(cache.put("tok-1", entry("a@example.com")));

        let cached = cache.try_get("tok-1").unwrap();
        assert_eq!(cached.email, "a@example.com");
        assert_eq!(cached.expiration, 1_900_000_000);
        assert_eq!(cached.refresh_left, 3);
    }

    #[test]
    fn test_miss() {
        let cache = SessionCache::new();
        assert!(cache.try_get("nonexistent").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_put_does_not_overwrite() {
        let cache = SessionCache::new();
        assert!(cache.put("tok-1", entry("first@example.com")));
        assert!(!cache.put("tok-1", entry("second@example.com")));

        assert_eq!(cache.try_get("tok-1").unwrap().email, "first@example.com");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove() {
        let cache = SessionCache::new();
        cache.put("tok-1", entry("a@example.com"));

        let removed = cache.remove("tok-1");
        assert_eq!(removed.map(|e| e.email), Some("a@example.com".to_string()));
        assert!(!cache.contains("tok-1"));

        // Removing again is a no-op
        assert!(cache.remove("tok-1").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = SessionCache::new();
        for i in 0..5 {
            cache.put(format!("tok-{i}"), entry("a@example.com"));
        }
        assert_eq!(cache.len(), 5);

        assert_eq!(cache.clear(), 5);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().clears, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let cache = SessionCache::new();
        let other = cache.clone();
        cache.put("tok-1", entry("a@example.com"));
        assert!(other.contains("tok-1"));
    }

    #[test]
    fn test_stats_hit_rate() {
        let cache = SessionCache::new();
        cache.put("tok-1", entry("a@example.com"));
        cache.try_get("tok-1");
        cache.try_get("tok-1");
        cache.try_get("tok-1");
        cache.try_get("missing");

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expires_at() {
        let e = CacheEntry::new("a@example.com", 0, 0);
        assert_eq!(e.expires_at().unwrap().timestamp(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_put_remove_clear() {
        let cache = SessionCache::new();
        let mut handles = Vec::new();

        for worker in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..500 {
                    let token = format!("tok-{worker}-{i}");
                    cache.put(token.clone(), CacheEntry::new("a@example.com", i, 1));
                    if i % 3 == 0 {
                        cache.remove(&token);
                    }
                    if worker == 0 && i % 50 == 0 {
                        cache.clear();
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Every surviving entry is intact and belongs to its token
        {
            let entries = cache.inner.entries.read();
            for (token, cached) in entries.iter() {
                let (_, i) = token
                    .strip_prefix("tok-")
                    .and_then(|rest| rest.split_once('-'))
                    .unwrap();
                let i: i64 = i.parse().unwrap();
                assert_eq!(cached.expiration, i, "entry for {token} was mixed up");
                assert_ne!(i % 3, 0, "{token} should have been removed");
                assert_eq!(cached.email, "a@example.com");
            }
        }

        cache.clear();
        assert!(cache.is_empty());

        cache.put("after-clear", entry("b@example.com"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.try_get("after-clear").unwrap().email, "b@example.com");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_put_same_token_first_writer_wins() {
        let cache = SessionCache::new();
        let mut handles = Vec::new();

        for worker in 0..16u32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.put("shared", CacheEntry::new(format!("{worker}@example.com"), 0, worker))
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        let winner = cache.try_get("shared").unwrap();
        assert_eq!(winner.email, format!("{}@example.com", winner.refresh_left));
    }
}
