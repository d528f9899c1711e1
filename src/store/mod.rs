//! State Store Module
//!
//! The key-value capability the cache facade is layered on. In production
//! this is a sidecar's state API; [`MemoryStateStore`] emulates one in
//! process for local runs and tests.

mod entry;
mod memory;
mod stats;

use async_trait::async_trait;

use crate::error::Result;

pub use entry::StateEntry;
pub use memory::MemoryStateStore;
pub use stats::StoreStats;

// == State Store ==
/// Key-value service reached through the sidecar.
///
/// Every call names the state store component it targets, so one sidecar
/// can back several logical stores. Keys are compared byte-for-byte.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns true when the sidecar is ready to serve requests.
    async fn health(&self) -> bool;

    /// Reads the raw bytes under `key`, `None` when absent or expired.
    async fn read(&self, store_name: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the value under `key`.
    ///
    /// `ttl_seconds` is the store-level countdown; `None` keeps the value
    /// until it is deleted.
    async fn write(
        &self,
        store_name: &str,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<()>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn delete(&self, store_name: &str, key: &str) -> Result<()>;
}
