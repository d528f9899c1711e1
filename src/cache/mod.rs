//! Cache Module
//!
//! Distributed cache facade with absolute and sliding expiration layered on
//! a flat-TTL state store.

mod blocking;
mod facade;
mod options;
mod record;
pub mod ttl;


// Re-export public types
pub use blocking::BlockingCache;
pub use facade::SidecarCache;
pub use options::CacheEntryOptions;
pub use record::{StoredRecord, RECORD_VERSION};
pub use ttl::{TtlDecision, NO_EXPIRATION};
