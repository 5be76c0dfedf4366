//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Owned handle to the running sweep.
///
/// The task stops when [`CleanupTask::stop`] is called or when the handle
/// is dropped, so a test or a restarted server never leaks a timer.
#[derive(Debug)]
pub struct CleanupTask {
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Stops the sweep.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Returns true once the task is no longer running.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task loops forever, sleeping for `interval` between runs and taking
/// the write lock only for the duration of one sweep.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(TtlCache::new(Duration::from_secs(1800))));
/// let cleanup = spawn_cleanup_task(cache.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// cleanup.stop();
/// ```
pub fn spawn_cleanup_task<V>(cache: Arc<RwLock<TtlCache<V>>>, interval: Duration) -> CleanupTask
where
    V: Clone + Send + Sync + 'static,
{
    let handle = tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    });

    CleanupTask { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_cache() -> Arc<RwLock<TtlCache<String>>> {
        Arc::new(RwLock::new(TtlCache::new(Duration::from_secs(300))))
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = shared_cache();
        cache
            .write()
            .await
            .set("expire_soon", "value".to_string(), Duration::from_secs(1));

        let task = spawn_cleanup_task(cache.clone(), Duration::from_secs(10));

        // Let one sweep run
        tokio::time::sleep(Duration::from_secs(11)).await;

        // Removed by the sweep, not by a read
        let guard = cache.read().await;
        assert!(!guard.contains_key("expire_soon"));
        assert_eq!(guard.stats().expired_removed, 1);
        drop(guard);

        task.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = shared_cache();
        cache
            .write()
            .await
            .set("long_lived", "value".to_string(), Duration::from_secs(3600));

        let task = spawn_cleanup_task(cache.clone(), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(25)).await;

        let value = cache.write().await.get("long_lived");
        assert_eq!(value, Some("value".to_string()));

        task.stop();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_stopped() {
        let task = spawn_cleanup_task(shared_cache(), Duration::from_secs(1));

        task.stop();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(task.is_finished(), "Task should be finished after stop");
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_on_drop() {
        let cache = shared_cache();
        let task = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
        assert_eq!(Arc::strong_count(&cache), 2);

        drop(task);
        tokio::time::sleep(Duration::from_millis(100)).await;

        // The aborted task released its clone of the cache
        assert_eq!(Arc::strong_count(&cache), 1);
    }
}
