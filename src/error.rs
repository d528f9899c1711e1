//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Range Messages ==
/// Message prefix for an absolute expiration that is not in the future.
pub const ABSOLUTE_EXPIRATION_IN_PAST: &str = "The absolute expiration value must be in the future.";

/// Message prefix for a non-positive relative expiration.
pub const RELATIVE_EXPIRATION_NOT_POSITIVE: &str =
    "The relative expiration value must be positive.";

/// Message prefix for a non-positive sliding expiration.
pub const SLIDING_EXPIRATION_NOT_POSITIVE: &str = "The sliding expiration value must be positive.";

// == Cache Error Enum ==
/// Unified error type for the cache facade.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A required argument is missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An expiration setting is out of range.
    ///
    /// The display text starts with one of the fixed range messages so
    /// callers can tell the cases apart by prefix.
    #[error("{0}")]
    InvalidRange(String),

    /// The sidecar reported itself unhealthy or could not be reached
    #[error("Sidecar unavailable: {0}")]
    Unavailable(String),

    /// A stored record exists but its metadata could not be decoded
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// The caller cancelled the operation before it touched the store
    #[error("Operation cancelled")]
    Cancelled,

    /// The state store rejected a request
    #[error("State store error: {0}")]
    Store(String),

    /// Key not found (HTTP surface only; the facade reports misses as `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Builds an `InvalidRange` error whose message starts with `prefix`.
    pub fn range(prefix: &str, detail: impl std::fmt::Display) -> Self {
        CacheError::InvalidRange(format!("{} {}", prefix, detail))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) | CacheError::InvalidRange(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Unavailable(_) | CacheError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Store(_) => StatusCode::BAD_GATEWAY,
            CacheError::CorruptRecord(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;
