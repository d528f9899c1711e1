//! TTL Calculator
//!
//! Reconciles the absolute and sliding bounds of a [`CacheEntryOptions`] into
//! the single flat countdown the state store understands, plus the metadata
//! the read path needs to renew sliding entries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheEntryOptions;
use crate::error::{
    CacheError, Result, ABSOLUTE_EXPIRATION_IN_PAST, RELATIVE_EXPIRATION_NOT_POSITIVE,
    SLIDING_EXPIRATION_NOT_POSITIVE,
};

/// Sentinel for "never expires" / "not sliding".
pub const NO_EXPIRATION: i64 = -1;

// == TTL Decision ==
/// Normalized expiration of one stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlDecision {
    /// TTL handed to the store, `-1` when the entry never expires
    pub cache_ttl_seconds: i64,
    /// Sliding window, `-1` when the entry is not sliding
    pub sliding_ttl_seconds: i64,
    /// Hard cap on sliding renewal. Only set when both bounds are active.
    pub absolute_deadline: Option<DateTime<Utc>>,
}

impl TtlDecision {
    /// Decision for an entry with no expiration at all.
    pub const fn never_expires() -> Self {
        Self {
            cache_ttl_seconds: NO_EXPIRATION,
            sliding_ttl_seconds: NO_EXPIRATION,
            absolute_deadline: None,
        }
    }

    /// Returns true when reads must renew this entry.
    pub fn is_sliding(&self) -> bool {
        self.sliding_ttl_seconds != NO_EXPIRATION
    }

    /// TTL to send with the store write, `None` meaning no expiry.
    pub fn store_ttl(&self) -> Option<u64> {
        u64::try_from(self.cache_ttl_seconds).ok()
    }

    // == Renewal ==
    /// Returns true once a capped sliding entry has reached its deadline.
    ///
    /// The store can still hold such an entry for up to a second, because
    /// renewals round the time left up to whole seconds.
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.absolute_deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Decision a sliding entry is written back with when read at `now`.
    ///
    /// Returns `None` for non-sliding entries. The window restarts but the
    /// store TTL is capped at the time left before the deadline, rounded up.
    /// The deadline itself is carried over unchanged so repeated renewals
    /// never push the entry past it.
    pub fn renewed(&self, now: DateTime<Utc>) -> Option<Self> {
        if !self.is_sliding() {
            return None;
        }

        let cache_ttl_seconds = match self.absolute_deadline {
            Some(deadline) => self.sliding_ttl_seconds.min(ceil_seconds(deadline - now)),
            None => self.sliding_ttl_seconds,
        };

        Some(Self {
            cache_ttl_seconds,
            ..*self
        })
    }
}

impl Default for TtlDecision {
    fn default() -> Self {
        Self::never_expires()
    }
}

// == Compute ==
/// Computes the TTL decision for `options` as of `now`.
///
/// `now` is sampled once by the caller; every comparison and subtraction in
/// here uses that single reading.
///
/// # Errors
/// - `InvalidRange` for an absolute instant at or before `now`, or a
///   relative or sliding duration that is zero or negative
/// - `InvalidArgument` when a relative duration overflows the calendar
pub fn compute(options: &CacheEntryOptions, now: DateTime<Utc>) -> Result<TtlDecision> {
    validate(options, now)?;

    let deadline = absolute_deadline(options, now)?;
    let absolute_ttl = deadline.map(|d| (d - now).num_seconds());
    let sliding_ttl = options.sliding_expiration.map(|w| w.num_seconds());

    let decision = match (absolute_ttl, sliding_ttl) {
        (None, None) => TtlDecision::never_expires(),
        (Some(absolute), None) => TtlDecision {
            cache_ttl_seconds: absolute,
            sliding_ttl_seconds: NO_EXPIRATION,
            absolute_deadline: None,
        },
        (None, Some(sliding)) => TtlDecision {
            cache_ttl_seconds: sliding,
            sliding_ttl_seconds: sliding,
            absolute_deadline: None,
        },
        (Some(absolute), Some(sliding)) if absolute > sliding => TtlDecision {
            cache_ttl_seconds: sliding,
            sliding_ttl_seconds: sliding,
            absolute_deadline: deadline,
        },
        // The sliding window can never outlive the cutoff, so it behaves
        // exactly like the absolute bound alone.
        (Some(absolute), Some(_)) => TtlDecision {
            cache_ttl_seconds: absolute,
            sliding_ttl_seconds: NO_EXPIRATION,
            absolute_deadline: None,
        },
    };

    Ok(decision)
}

fn validate(options: &CacheEntryOptions, now: DateTime<Utc>) -> Result<()> {
    if let Some(at) = options.absolute_expiration {
        if at <= now {
            return Err(CacheError::range(
                ABSOLUTE_EXPIRATION_IN_PAST,
                format!("(Parameter 'absolute_expiration') Actual value was {}.", at.to_rfc3339()),
            ));
        }
    }

    if let Some(after) = options.absolute_expiration_relative_to_now {
        if after <= Duration::zero() {
            return Err(CacheError::range(
                RELATIVE_EXPIRATION_NOT_POSITIVE,
                format!(
                    "(Parameter 'absolute_expiration_relative_to_now') Actual value was {}ms.",
                    after.num_milliseconds()
                ),
            ));
        }
    }

    if let Some(window) = options.sliding_expiration {
        if window <= Duration::zero() {
            return Err(CacheError::range(
                SLIDING_EXPIRATION_NOT_POSITIVE,
                format!(
                    "(Parameter 'sliding_expiration') Actual value was {}ms.",
                    window.num_milliseconds()
                ),
            ));
        }
    }

    Ok(())
}

/// Whole seconds in `span`, rounded up and never negative.
fn ceil_seconds(span: Duration) -> i64 {
    let whole = span.num_seconds();
    let rounded = if span > Duration::seconds(whole) { whole + 1 } else { whole };
    rounded.max(0)
}

/// Earliest of the absolute instant and `now + relative`.
fn absolute_deadline(
    options: &CacheEntryOptions,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    let relative = match options.absolute_expiration_relative_to_now {
        Some(after) => Some(now.checked_add_signed(after).ok_or_else(|| {
            CacheError::InvalidArgument(format!(
                "relative expiration of {}s is out of range",
                after.num_seconds()
            ))
        })?),
        None => None,
    };

    Ok(match (options.absolute_expiration, relative) {
        (Some(at), Some(rel)) => Some(at.min(rel)),
        (at, rel) => at.or(rel),
    })
}
