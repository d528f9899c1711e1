//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Purges expired entries from the in-memory state store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
