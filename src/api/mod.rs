//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints of the Devsite API.
//! It includes:
//! - Article API endpoints, including tag analytics
//! - Position API endpoints
//! - Health endpoint

pub mod articles;
pub mod common;
pub mod health;
pub mod middleware;
pub mod positions;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, RequestStats};

/// Build the API router (mounted under `/api/v1`)
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .merge(articles::router())
        .merge(positions::router())
        .merge(health::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .nest("/api/v1", build_api_router())
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        // Request stats middleware (outermost layer, runs for all requests)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state)
}

/// CORS policy for the configured origin
///
/// `*` allows any origin without credentials. A concrete origin is allowed
/// with credentials. An origin that is not a valid header value falls back to `*`.
fn cors_layer(cors_origin: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION];

    let origin = if cors_origin.trim() == "*" {
        None
    } else {
        match cors_origin.trim().parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(e) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any origin: {}", cors_origin, e);
                None
            }
        }
    };

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::repositories::{SqlxArticleRepository, SqlxPositionRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::services::{ArticleService, PositionService};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::sync::Arc;

    /// State over a fresh in-memory database with migrations applied
    pub(crate) async fn test_state() -> AppState {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        AppState {
            article_service: Arc::new(ArticleService::new(SqlxArticleRepository::boxed(pool.clone()))),
            position_service: Arc::new(PositionService::new(SqlxPositionRepository::boxed(pool.clone()))),
            request_stats: Arc::new(RequestStats::new()),
            pool,
        }
    }

    pub(crate) async fn test_server() -> TestServer {
        TestServer::new(build_router(test_state().await, "*")).expect("Failed to start test server")
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = test_server().await;
        let response = server.get("/api/v2/articles").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_any_origin() {
        let server = test_server().await;
        let response = server
            .get("/api/v1/health")
            .add_header(header::ORIGIN, HeaderValue::from_static("https://example.com"))
            .await;

        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("*")
        );
    }

    #[tokio::test]
    async fn test_cors_configured_origin_allows_credentials() {
        let server = TestServer::new(build_router(test_state().await, "https://devsite.io"))
            .expect("Failed to start test server");
        let response = server
            .get("/api/v1/health")
            .add_header(header::ORIGIN, HeaderValue::from_static("https://devsite.io"))
            .await;

        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("https://devsite.io")
        );
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            HeaderValue::from_static("true")
        );
    }
}
