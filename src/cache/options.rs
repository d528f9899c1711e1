//! Cache Entry Options
//!
//! Per-write expiration settings handed to [`SidecarCache::set`](crate::cache::SidecarCache::set).

use chrono::{DateTime, Duration, Utc};

// == Cache Entry Options ==
/// Expiration settings for a single cache write.
///
/// `absolute_expiration` and `absolute_expiration_relative_to_now` are two
/// ways of expressing the same bound; when both are set the earlier
/// deadline wins. A sliding bound may be combined with either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheEntryOptions {
    /// Fixed wall-clock deadline
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Deadline expressed relative to the time of the write
    pub absolute_expiration_relative_to_now: Option<Duration>,
    /// Window that restarts on every successful read
    pub sliding_expiration: Option<Duration>,
}

impl CacheEntryOptions {
    /// Options for an entry that never expires.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire at a fixed instant.
    pub fn with_absolute_expiration(mut self, at: DateTime<Utc>) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    /// Expire a fixed amount of time after the write.
    pub fn with_absolute_expiration_relative_to_now(mut self, after: Duration) -> Self {
        self.absolute_expiration_relative_to_now = Some(after);
        self
    }

    /// Expire after `window` without a read.
    pub fn with_sliding_expiration(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    /// Returns true when no expiration bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.absolute_expiration.is_none()
            && self.absolute_expiration_relative_to_now.is_none()
            && self.sliding_expiration.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert!(CacheEntryOptions::new().is_unbounded());
    }

    #[test]
    fn test_builder_sets_fields() {
        let at = Utc::now() + Duration::minutes(5);
        let options = CacheEntryOptions::new()
            .with_absolute_expiration(at)
            .with_absolute_expiration_relative_to_now(Duration::seconds(30))
            .with_sliding_expiration(Duration::seconds(10));

        assert_eq!(options.absolute_expiration, Some(at));
        assert_eq!(
            options.absolute_expiration_relative_to_now,
            Some(Duration::seconds(30))
        );
        assert_eq!(options.sliding_expiration, Some(Duration::seconds(10)));
        assert!(!options.is_unbounded());
    }
}
