//! API Routes
//!
//! Configures the Axum router with all demo service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, listeners_handler, set_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a JSON value under a key
/// - `GET /get/:key` - Retrieve a live value by key
/// - `DELETE /del/:key` - Delete a key
/// - `POST /clear` - Remove every entry
/// - `GET /stats` - Get cache statistics
/// - `GET /events/:name` - Count listeners of a lifecycle event
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/events/:name", get(listeners_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let state =
            AppState::with_durations(Duration::from_secs(300), Duration::from_secs(60)).unwrap();
        create_router(state)
    }

    async fn status_of(app: &Router, method: &str, uri: &str) -> StatusCode {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_routes_bind_expected_methods() {
        let app = create_test_app();

        for (method, uri) in [
            ("GET", "/set"),
            ("POST", "/get/k"),
            ("GET", "/del/k"),
            ("GET", "/clear"),
            ("DELETE", "/stats"),
            ("PUT", "/events/cache.set"),
            ("POST", "/health"),
        ] {
            assert_eq!(
                status_of(&app, method, uri).await,
                StatusCode::METHOD_NOT_ALLOWED,
                "{} {}",
                method,
                uri
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let app = create_test_app();

        assert_eq!(status_of(&app, "GET", "/keys").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of(&app, "GET", "/get").await, StatusCode::NOT_FOUND);
    }
}
