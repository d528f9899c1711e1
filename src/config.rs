//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Default state store component name.
pub const DEFAULT_STORE_NAME: &str = "statestore";

// == Cache Options ==
/// Settings the cache facade needs to address the sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Name of the state store component all keys live in
    pub store_name: String,
}

impl CacheOptions {
    /// Creates options targeting `store_name`.
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
        }
    }

    /// Rejects options the facade cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.store_name.trim().is_empty() {
            return Err(CacheError::InvalidArgument(
                "store_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_NAME)
    }
}

// == Server Config ==
/// Development server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// State store component name used by the cache facade
    pub store_name: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_STORE_NAME` - State store component name (default: statestore)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            store_name: env::var("CACHE_STORE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(1),
        }
    }

    /// Facade options derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new(self.store_name.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
