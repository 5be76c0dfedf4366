//! Cache Store Module
//!
//! TTL cache combining HashMap storage with lazy expiry on read and an
//! explicit sweep for entries that are never read again.

use std::collections::HashMap;

use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Key/value store with per-entry expiration.
///
/// Unbounded in count; the only removal policy is time-based. A caller never
/// observes an expired value: `get` drops it on sight even when the periodic
/// sweep has not run yet.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL applied by [`TtlCache::insert`]
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used by `insert` when the caller does not pick one
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, valid for `ttl` from now.
    ///
    /// Any existing entry for the key is replaced unconditionally.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    /// Stores `value` under `key` with the default TTL.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.default_ttl;
        self.set(key, value, ttl);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` if the key is absent or expired. Expired entries are
    /// removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Same as [`TtlCache::get`], evaluated at an explicit instant.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let expired = self.entries.get(key).map(|entry| entry.is_expired_at(now));

        match expired {
            Some(false) => {
                self.stats.record_hit();
                self.entries.get(key).map(|entry| entry.value.clone())
            }
            Some(true) => {
                debug!("Cache entry expired on read, removing");
                self.entries.remove(key);
                self.stats.record_expired(1);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes any entry for `key`.
    ///
    /// Returns whether an entry was present; absence is not an error.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes all entries. Hit/miss counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup ==
    /// Removes every entry whose age exceeds its own TTL.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        self.cleanup_at(Instant::now())
    }

    /// Same as [`TtlCache::cleanup`], evaluated at an explicit instant.
    pub fn cleanup_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the number of physically stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether an entry is physically stored, without expiry checks
    /// or statistics side effects.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store: TtlCache<String> = TtlCache::new(TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = TtlCache::new(TTL);

        store.set("key1", "value1".to_string(), Duration::from_secs(60));

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: TtlCache<String> = TtlCache::new(TTL);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_insert_uses_default_ttl() {
        let mut store = TtlCache::new(Duration::from_secs(5));
        store.insert("key", 7u32);

        let created = Instant::now();
        assert_eq!(store.get_at("key", created + Duration::from_secs(4)), Some(7));
        assert_eq!(store.get_at("key", created + Duration::from_secs(6)), None);
    }

    #[test]
    fn test_store_delete() {
        let mut store = TtlCache::new(TTL);

        store.insert("key1", "value1".to_string());
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent_is_not_an_error() {
        let mut store: TtlCache<String> = TtlCache::new(TTL);
        assert!(!store.delete("nonexistent"));
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = TtlCache::new(TTL);

        store.insert("key1", "value1".to_string());
        store.insert("key1", "value2".to_string());

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = TtlCache::new(TTL);
        let start = Instant::now();

        store.set("key", 1u32, Duration::from_secs(1));
        store.set("key", 2u32, Duration::from_secs(100));

        assert_eq!(store.get_at("key", start + Duration::from_secs(50)), Some(2));
    }

    #[test]
    fn test_store_clear() {
        let mut store = TtlCache::new(TTL);
        store.insert("a", 1u32);
        store.insert("b", 2u32);

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.stats().total_entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_lazy_expiry_removes_entry() {
        let mut store = TtlCache::new(TTL);
        store.set("key1", "value1".to_string(), Duration::from_secs(1));

        // Should be accessible immediately
        assert!(store.get("key1").is_some());

        tokio::time::advance(Duration::from_millis(1100)).await;

        // Still stored until read
        assert!(store.contains_key("key1"));
        assert!(store.get("key1").is_none());
        assert!(!store.contains_key("key1"));
        assert_eq!(store.stats().expired_removed, 1);
    }

    #[test]
    fn test_store_cleanup_removes_only_expired() {
        let mut store = TtlCache::new(TTL);
        let start = Instant::now();

        store.set("short", "value1".to_string(), Duration::from_secs(1));
        store.set("long", "value2".to_string(), Duration::from_secs(10));

        let removed = store.cleanup_at(start + Duration::from_secs(5));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(!store.contains_key("short"));
        assert_eq!(
            store.get_at("long", start + Duration::from_secs(5)),
            Some("value2".to_string())
        );
    }

    #[test]
    fn test_store_stats() {
        let mut store = TtlCache::new(TTL);

        store.insert("key1", "value1".to_string());
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
