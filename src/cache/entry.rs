//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use tokio::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// An entry is valid while `now - created_at <= ttl`. Entries are never
/// mutated; a re-write with the same key replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation instant
    pub created_at: Instant,
    /// Lifetime of the entry
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - How long the entry stays valid
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    // == Age ==
    /// Time elapsed since creation, as observed at `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Boundary condition: an entry whose age equals its TTL is still valid;
    /// it expires once the age strictly exceeds the TTL.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) > self.ttl
    }
}
