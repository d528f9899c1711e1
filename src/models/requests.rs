//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::cache::CacheEntryOptions;

/// Request body for the SET operation (PUT /set)
///
/// Durations are signed whole seconds so out-of-range values reach the TTL
/// calculator and come back as range errors.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Fixed expiry instant (RFC 3339)
    #[serde(default)]
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Expiry relative to the write, in seconds
    #[serde(default)]
    pub relative_expiration_secs: Option<i64>,
    /// Sliding window in seconds
    #[serde(default)]
    pub sliding_expiration_secs: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        for (name, secs) in [
            ("relative_expiration_secs", self.relative_expiration_secs),
            ("sliding_expiration_secs", self.sliding_expiration_secs),
        ] {
            if secs.is_some_and(|s| Duration::try_seconds(s).is_none()) {
                return Some(format!("{} is out of range", name));
            }
        }
        None
    }

    /// Expiration settings carried by this request.
    pub fn options(&self) -> CacheEntryOptions {
        CacheEntryOptions {
            absolute_expiration: self.absolute_expiration,
            absolute_expiration_relative_to_now: self
                .relative_expiration_secs
                .and_then(Duration::try_seconds),
            sliding_expiration: self.sliding_expiration_secs.and_then(Duration::try_seconds),
        }
    }
}
