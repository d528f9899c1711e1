//! TTL Cleanup Task
//!
//! Background task that periodically purges expired entries from the
//! in-memory state store, the way a sidecar state component reclaims keys
//! whose TTL has run out.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStateStore;

/// Spawns a background task that periodically removes expired state entries.
///
/// Reads already treat expired entries as absent; this only bounds memory.
///
/// # Arguments
/// * `store` - Shared in-memory state store
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStateStore::new());
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: Arc<MemoryStateStore>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::StateStore;

    const STORE: &str = "statestore";

    fn store_with_clock() -> (Arc<MemoryStateStore>, ManualClock) {
        let clock = ManualClock::default();
        let store = Arc::new(MemoryStateStore::with_clock(Arc::new(clock.clone())));
        (store, clock)
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let (store, clock) = store_with_clock();

        store
            .write(STORE, "expire_soon", b"value".to_vec(), Some(1))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(2));

        let handle = spawn_cleanup_task(store.clone(), 1);

        // Wait for the first cleanup run
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.len().await, 0, "Expired entry should have been cleaned up");
        assert_eq!(store.stats().await.expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let (store, _clock) = store_with_clock();

        store
            .write(STORE, "long_lived", b"value".to_vec(), Some(3600))
            .await
            .unwrap();
        store.write(STORE, "forever", b"value".to_vec(), None).await.unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.len().await, 2, "Valid entries should not be removed");
        assert_eq!(
            store.read(STORE, "long_lived").await.unwrap().as_deref(),
            Some(&b"value"[..])
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(MemoryStateStore::new());

        let handle = spawn_cleanup_task(store, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
