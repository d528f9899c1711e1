//! In-Memory State Store
//!
//! HashMap-backed state store with the flat TTL countdown of a sidecar
//! state component. Expired entries are dropped lazily on read and in bulk
//! by [`MemoryStateStore::cleanup_expired`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::{system_clock, Clock};
use crate::error::Result;
use crate::store::{StateEntry, StateStore, StoreStats};

/// Entries are namespaced by state store name.
type StateKey = (String, String);

#[derive(Debug, Default)]
struct Inner {
    /// Key-value storage
    entries: HashMap<StateKey, StateEntry>,
    /// Activity counters
    stats: StoreStats,
}

// == Memory State Store ==
/// Sidecar state store emulation held entirely in process memory.
#[derive(Debug)]
pub struct MemoryStateStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
    healthy: AtomicBool,
}

impl MemoryStateStore {
    // == Constructor ==
    /// Creates an empty store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    /// Creates an empty store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
            healthy: AtomicBool::new(true),
        }
    }

    /// Marks the store as reachable or not. Unhealthy stores still serve
    /// requests; only [`StateStore::health`] changes.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    // == Stats ==
    /// Returns current store statistics.
    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
        let count = before - inner.entries.len();

        let total = inner.entries.len();
        inner.stats.record_expirations(count);
        inner.stats.set_total_entries(total);
        count
    }

    /// Remaining store-level TTL of `key`, for inspection in tests.
    ///
    /// Outer `None` when the key is absent, inner `None` when it never expires.
    pub async fn ttl_remaining(&self, store_name: &str, key: &str) -> Option<Option<u64>> {
        let now = self.clock.now();
        let inner = self.inner.read().await;
        inner
            .entries
            .get(&state_key(store_name, key))
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    /// Overwrites the raw bytes under `key` without any TTL, bypassing the
    /// facade's encoding.
    pub async fn put_raw(&self, store_name: &str, key: &str, value: Vec<u8>) {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;
        inner
            .entries
            .insert(state_key(store_name, key), StateEntry::new(value, None, now));
    }

    // == Length ==
    /// Returns the number of entries held, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Returns true if the store holds nothing.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn health(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    // == Read ==
    async fn read(&self, store_name: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now();
        let key = state_key(store_name, key);
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        let expired = match inner.entries.get(&key) {
            Some(entry) if !entry.is_expired(now) => {
                inner.stats.record_hit();
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.remove(&key);
            let total = inner.entries.len();
            inner.stats.record_expirations(1);
            inner.stats.set_total_entries(total);
            debug!(store = %key.0, key = %key.1, "state entry expired on read");
        }

        inner.stats.record_miss();
        Ok(None)
    }

    // == Write ==
    async fn write(
        &self,
        store_name: &str,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<()> {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;

        inner
            .entries
            .insert(state_key(store_name, key), StateEntry::new(value, ttl_seconds, now));

        let total = inner.entries.len();
        inner.stats.record_write();
        inner.stats.set_total_entries(total);
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, store_name: &str, key: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.entries.remove(&state_key(store_name, key));

        let total = inner.entries.len();
        inner.stats.set_total_entries(total);
        Ok(())
    }
}

fn state_key(store_name: &str, key: &str) -> StateKey {
    (store_name.to_string(), key.to_string())
}
