//! API Routes
//!
//! Maps the cache facade operations onto HTTP paths.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, refresh_handler, set_handler, stats_handler,
    AppState,
};

/// Builds the development server router.
///
/// | Method | Path | Facade call |
/// |---|---|---|
/// | `PUT` | `/set` | `set` |
/// | `GET` | `/get/:key` | `get` (renews sliding entries) |
/// | `DELETE` | `/del/:key` | `remove` |
/// | `POST` | `/refresh/:key` | `refresh` |
/// | `GET` | `/stats` | in-memory store counters |
/// | `GET` | `/health` | sidecar health probe |
///
/// Requests are traced and CORS is open, as this server is a local tool.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/refresh/:key", post(refresh_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Duration;
    use tower::util::ServiceExt;

    use crate::cache::SidecarCache;
    use crate::clock::ManualClock;
    use crate::config::CacheOptions;
    use crate::store::MemoryStateStore;

    fn clocked_app() -> (Router, AppState, ManualClock) {
        let clock = ManualClock::default();
        let store = Arc::new(MemoryStateStore::with_clock(Arc::new(clock.clone())));
        let cache =
            SidecarCache::with_clock(store.clone(), CacheOptions::default(), Arc::new(clock.clone()))
                .unwrap();
        let state = AppState::new(cache, store);
        (create_router(state.clone()), state, clock)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_get_renews_sliding_entry_in_store() {
        let (app, state, clock) = clocked_app();
        let body = r#"{"key":"s","value":"v","sliding_expiration_secs":10}"#;
        assert_eq!(send(&app, "PUT", "/set", Some(body)).await, StatusCode::OK);

        clock.advance(Duration::seconds(8));
        assert_eq!(state.store.ttl_remaining("statestore", "s").await, Some(Some(2)));

        assert_eq!(send(&app, "GET", "/get/s", None).await, StatusCode::OK);
        assert_eq!(state.store.ttl_remaining("statestore", "s").await, Some(Some(10)));
    }

    #[tokio::test]
    async fn test_refresh_keeps_capped_entry_until_deadline() {
        let (app, _, clock) = clocked_app();
        let body = r#"{"key":"c","value":"v","sliding_expiration_secs":1,"relative_expiration_secs":3}"#;
        assert_eq!(send(&app, "PUT", "/set", Some(body)).await, StatusCode::OK);

        for _ in 0..5 {
            clock.advance(Duration::milliseconds(500));
            assert_eq!(send(&app, "POST", "/refresh/c", None).await, StatusCode::OK);
        }
        assert_eq!(send(&app, "GET", "/get/c", None).await, StatusCode::OK);

        clock.advance(Duration::milliseconds(600));
        assert_eq!(send(&app, "GET", "/get/c", None).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fixed_entry_is_not_rewritten_on_read() {
        let (app, state, _) = clocked_app();
        let body = r#"{"key":"f","value":"v","relative_expiration_secs":60}"#;
        send(&app, "PUT", "/set", Some(body)).await;

        for _ in 0..3 {
            assert_eq!(send(&app, "GET", "/get/f", None).await, StatusCode::OK);
        }

        let stats = state.store.stats().await;
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.hits, 3);
    }

    #[tokio::test]
    async fn test_unknown_route_and_wrong_method() {
        let (app, _, _) = clocked_app();

        assert_eq!(send(&app, "GET", "/keys", None).await, StatusCode::NOT_FOUND);
        assert_eq!(
            send(&app, "GET", "/refresh/k", None).await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
