//! Sidecar Cache Facade
//!
//! Distributed cache over a [`StateStore`], emulating absolute and sliding
//! expiration on top of the store's flat TTL countdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{ttl, CacheEntryOptions, StoredRecord};
use crate::clock::{system_clock, Clock};
use crate::config::CacheOptions;
use crate::error::{CacheError, Result};
use crate::store::StateStore;

// == Sidecar Cache ==
/// Stateless cache facade. Cheap to clone; clones share the store handle.
///
/// # Reads have side effects
/// [`get`](Self::get) and [`refresh`](Self::refresh) re-write sliding
/// entries to restart their window, so two consecutive reads are not
/// equivalent to one from the store's point of view.
#[derive(Clone)]
pub struct SidecarCache {
    store: Arc<dyn StateStore>,
    store_name: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SidecarCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidecarCache")
            .field("store_name", &self.store_name)
            .finish_non_exhaustive()
    }
}

impl SidecarCache {
    // == Constructor ==
    /// Creates a facade over `store` using the system clock.
    ///
    /// # Errors
    /// `InvalidArgument` when `options` names no state store.
    pub fn new(store: Arc<dyn StateStore>, options: CacheOptions) -> Result<Self> {
        Self::with_clock(store, options, system_clock())
    }

    /// Creates a facade that reads time from `clock`.
    pub fn with_clock(
        store: Arc<dyn StateStore>,
        options: CacheOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            store,
            store_name: options.store_name,
            clock,
        })
    }

    // == Get ==
    /// Returns the payload stored under `key`, or `None` when absent.
    ///
    /// A sliding entry is renewed before its payload is returned: the record
    /// is written back with a fresh window, capped by its absolute deadline.
    /// A sliding entry read at or after its deadline reads as absent and is
    /// not written back.
    ///
    /// # Errors
    /// - `CorruptRecord` when the stored bytes cannot be decoded
    /// - any error from the renewal write; the payload is not returned
    pub async fn get(&self, key: &str, token: &CancellationToken) -> Result<Option<Vec<u8>>> {
        self.preflight(key, token).await?;
        self.read_and_renew(key, token).await
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous record.
    ///
    /// Expiration settings are validated before the sidecar is contacted.
    pub async fn set(
        &self,
        key: &str,
        value: &[u8],
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()> {
        ensure_live(token)?;
        validate_key(key)?;
        let decision = ttl::compute(options, self.clock.now())?;

        self.ensure_healthy().await?;
        ensure_live(token)?;

        let record = StoredRecord::new(value.to_vec(), decision);
        self.write_record(key, &record).await
    }

    // == Remove ==
    /// Deletes `key`. Removing an absent key succeeds.
    pub async fn remove(&self, key: &str, token: &CancellationToken) -> Result<()> {
        self.preflight(key, token).await?;
        self.store.delete(&self.store_name, key).await?;
        debug!(key, "cache entry removed");
        Ok(())
    }

    // == Refresh ==
    /// Renews a sliding entry without returning it. Absent keys succeed.
    pub async fn refresh(&self, key: &str, token: &CancellationToken) -> Result<()> {
        self.preflight(key, token).await?;
        self.read_and_renew(key, token).await.map(|_| ())
    }

    // == String Helpers ==
    /// Reads a UTF-8 string value.
    pub async fn get_string(&self, key: &str, token: &CancellationToken) -> Result<Option<String>> {
        match self.get(key, token).await? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                CacheError::InvalidArgument(format!("value under '{}' is not UTF-8: {}", key, e))
            }),
            None => Ok(None),
        }
    }

    /// Stores a string as its UTF-8 bytes.
    pub async fn set_string(
        &self,
        key: &str,
        value: &str,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()> {
        self.set(key, value.as_bytes(), options, token).await
    }

    // == Internals ==
    async fn preflight(&self, key: &str, token: &CancellationToken) -> Result<()> {
        ensure_live(token)?;
        validate_key(key)?;
        self.ensure_healthy().await?;
        ensure_live(token)
    }

    async fn ensure_healthy(&self) -> Result<()> {
        if self.store.health().await {
            Ok(())
        } else {
            warn!(store = %self.store_name, "sidecar reported unhealthy");
            Err(CacheError::Unavailable("sidecar is unhealthy".to_string()))
        }
    }

    async fn read_and_renew(
        &self,
        key: &str,
        token: &CancellationToken,
    ) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.store.read(&self.store_name, key).await? else {
            debug!(key, "cache miss");
            return Ok(None);
        };

        let record = StoredRecord::decode(&raw).map_err(|e| {
            warn!(key, error = %e, "stored record could not be decoded");
            e
        })?;

        let now = self.clock.now();
        if record.decision.is_past_deadline(now) {
            // The store may still hold the key; writing it back would
            // resurrect an entry whose deadline already passed.
            debug!(key, "sliding entry past its deadline, treating as absent");
            return Ok(None);
        }

        let Some(decision) = record.decision.renewed(now) else {
            debug!(key, "cache hit");
            return Ok(Some(record.payload));
        };
        ensure_live(token)?;

        let renewed = StoredRecord::new(record.payload, decision);
        self.write_record(key, &renewed).await?;
        debug!(key, ttl = decision.cache_ttl_seconds, "sliding entry renewed");

        Ok(Some(renewed.payload))
    }

    async fn write_record(&self, key: &str, record: &StoredRecord) -> Result<()> {
        let bytes = record.encode()?;
        self.store
            .write(&self.store_name, key, bytes, record.decision.store_ttl())
            .await?;
        debug!(
            key,
            ttl = record.decision.cache_ttl_seconds,
            sliding = record.decision.sliding_ttl_seconds,
            "cache entry written"
        );
        Ok(())
    }
}

fn ensure_live(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        Err(CacheError::Cancelled)
    } else {
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument("key must not be empty".to_string()));
    }
    Ok(())
}
