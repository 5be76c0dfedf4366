//! Cache Module
//!
//! Provides in-memory memoization of chat responses with TTL expiration.

mod entry;
mod fingerprint;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::ChatResponse;

// Re-export public types
pub use entry::CacheEntry;
pub use fingerprint::fingerprint;
pub use stats::CacheStats;
pub use store::TtlCache;

/// Response cache shared between the chat service, the admin handlers and
/// the cleanup task.
pub type SharedCache = Arc<RwLock<TtlCache<ChatResponse>>>;

/// Wraps a cache for sharing across tasks.
pub fn shared(cache: TtlCache<ChatResponse>) -> SharedCache {
    Arc::new(RwLock::new(cache))
}
