//! Dapr Cache - A distributed cache facade over a sidecar state store
//!
//! Emulates absolute and sliding expiration on top of a key-value store that
//! only knows a flat TTL countdown.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{BlockingCache, CacheEntryOptions, SidecarCache};
pub use config::{CacheOptions, Config};
pub use error::{CacheError, Result};
pub use store::{MemoryStateStore, StateStore};
pub use tasks::spawn_cleanup_task;
