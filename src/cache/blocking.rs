//! Blocking Cache Adapter
//!
//! Synchronous wrapper that drives the async [`SidecarCache`] methods on a
//! private current-thread runtime. There is no second code path: every call
//! here is `block_on` of the matching async method.

use std::future::Future;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheEntryOptions, SidecarCache};
use crate::error::{CacheError, Result};

// == Blocking Cache ==
/// Blocking form of [`SidecarCache`].
///
/// Calls made from inside an async runtime fail with `Internal` instead of
/// panicking inside `block_on`.
#[derive(Debug)]
pub struct BlockingCache {
    inner: SidecarCache,
    runtime: Runtime,
}

impl BlockingCache {
    /// Wraps `inner` with its own runtime.
    pub fn new(inner: SidecarCache) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    /// See [`SidecarCache::get`]. May renew a sliding entry.
    pub fn get(&self, key: &str, token: &CancellationToken) -> Result<Option<Vec<u8>>> {
        self.run(self.inner.get(key, token))
    }

    /// See [`SidecarCache::set`].
    pub fn set(
        &self,
        key: &str,
        value: &[u8],
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()> {
        self.run(self.inner.set(key, value, options, token))
    }

    /// See [`SidecarCache::remove`].
    pub fn remove(&self, key: &str, token: &CancellationToken) -> Result<()> {
        self.run(self.inner.remove(key, token))
    }

    /// See [`SidecarCache::refresh`].
    pub fn refresh(&self, key: &str, token: &CancellationToken) -> Result<()> {
        self.run(self.inner.refresh(key, token))
    }

    pub fn get_string(&self, key: &str, token: &CancellationToken) -> Result<Option<String>> {
        self.run(self.inner.get_string(key, token))
    }

    pub fn set_string(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()> {
        self.run(self.inner.set_string(key, value, options, token))
    }

    fn run<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        if Handle::try_current().is_ok() {
            return Err(CacheError::Internal(
                "blocking cache called from inside an async runtime".to_string(),
            ));
        }
        self.runtime.block_on(operation)
    }
}
