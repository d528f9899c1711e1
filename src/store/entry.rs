//! State Entry Module
//!
//! A single value held by the in-memory state store, with the flat TTL
//! countdown a sidecar state store applies.

use chrono::{DateTime, Duration, Utc};

// == State Entry ==
/// Stored bytes and their optional expiry instant.
#[derive(Debug, Clone)]
pub struct StateEntry {
    /// Opaque stored bytes
    pub value: Vec<u8>,
    /// Expiry instant, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl StateEntry {
    // == Constructor ==
    /// Creates an entry written at `now` with an optional TTL in seconds.
    pub fn new(value: Vec<u8>, ttl_seconds: Option<u64>, now: DateTime<Utc>) -> Self {
        let expires_at = ttl_seconds
            .and_then(|ttl| i64::try_from(ttl).ok())
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl));

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is expired once `now` reaches its expiry instant, so a
    /// zero TTL expires immediately.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Remaining whole seconds, `Some(0)` once expired, None if unbounded.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at
            .map(|expires| u64::try_from((expires - now).num_seconds()).unwrap_or(0))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_no_ttl() {
        let now = Utc::now();
        let entry = StateEntry::new(b"test_value".to_vec(), None, now);

        assert_eq!(entry.value, b"test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(now + Duration::days(365)));
        assert!(entry.ttl_remaining(now).is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let now = Utc::now();
        let entry = StateEntry::new(b"v".to_vec(), Some(1), now);

        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::milliseconds(999)));
        assert!(entry.is_expired(now + Duration::milliseconds(1100)));
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Utc::now();
        let entry = StateEntry::new(b"v".to_vec(), Some(10), now);

        assert_eq!(entry.ttl_remaining(now), Some(10));
        assert_eq!(entry.ttl_remaining(now + Duration::seconds(4)), Some(6));
        assert_eq!(entry.ttl_remaining(now + Duration::seconds(11)), Some(0));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let now = Utc::now();
        let entry = StateEntry::new(b"v".to_vec(), Some(0), now);
        assert!(entry.is_expired(now), "Entry should be expired at boundary");
    }
}
