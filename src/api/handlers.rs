//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::cache::SidecarCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, RefreshResponse, SetRequest, SetResponse,
    StatsResponse,
};
use crate::store::{MemoryStateStore, StateStore};

/// Application state shared across all handlers.
///
/// The facade holds no cache state of its own; the store handle is kept
/// alongside it for statistics and the cleanup task.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Cache facade serving requests
    pub cache: SidecarCache,
    /// In-memory state store behind the facade
    pub store: Arc<MemoryStateStore>,
    /// Cancelled when the server shuts down
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new AppState over an existing facade and store.
    pub fn new(cache: SidecarCache, store: Arc<MemoryStateStore>) -> Self {
        Self {
            cache,
            store,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds an in-memory state store and a facade targeting the configured
    /// store name.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(MemoryStateStore::new());
        let cache = SidecarCache::new(store.clone(), config.cache_options())?;
        Ok(Self::new(cache, store))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair with optional absolute and sliding expiration.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidArgument(error_msg));
    }

    state
        .cache
        .set_string(&req.key, &req.value, &req.options(), &state.shutdown)
        .await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value by key, renewing it when it has sliding expiration.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get_string(&key, &state.shutdown).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deletes a key. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.remove(&key, &state.shutdown).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /refresh/:key
///
/// Restarts the sliding window of a key without returning its value.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RefreshResponse>> {
    state.cache.refresh(&key, &state.shutdown).await?;

    Ok(Json(RefreshResponse::new(key)))
}

/// Handler for GET /stats
///
/// Returns state store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats().await))
}

/// Handler for GET /health
///
/// Reports whether the state store behind the facade is healthy.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_sidecar(state.store.health().await))
}
