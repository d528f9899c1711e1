//! State Store Statistics
//!
//! Counters kept by the in-memory state store: reads that found a live
//! value, reads that did not, and entries dropped by their TTL.

use serde::Serialize;

// == Store Stats ==
/// Tracks state store activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads for absent or expired keys
    pub misses: u64,
    /// Entries dropped because their TTL ran out
    pub expirations: u64,
    /// Writes accepted by the store
    pub writes: u64,
    /// Current number of stored entries
    pub total_entries: usize,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts `count` entries removed by TTL.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
