//! Health endpoint
//!
//! GET /api/v1/health reports liveness, database reachability and request statistics.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;

/// Response for the health endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub avg_response_time_us: f64,
}

/// Build the health router
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /api/v1/health
///
/// Answers 503 when the database does not respond.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, database) = match state.pool.ping().await {
        Ok(()) => (StatusCode::OK, "ok", "ok"),
        Err(e) => {
            tracing::warn!("Health check failed: {:#}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    let stats = &state.request_stats;
    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
            uptime_seconds: stats.uptime_seconds(),
            total_requests: stats.total_requests(),
            avg_response_time_us: stats.avg_response_time_us(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{test_server, test_state};
    use axum::http::StatusCode;
    use serde_json::Value;

    #[tokio::test]
    async fn test_health_counts_requests() {
        let server = test_server().await;

        server.get("/api/v1/positions").await;
        let response = server.get("/api/v1/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "ok");
        // The stats layer records after the handler returns
        assert_eq!(body["totalRequests"], 1);
    }

    #[tokio::test]
    async fn test_health_reports_closed_database() {
        let state = test_state().await;
        state.pool.close().await;
        let server = axum_test::TestServer::new(crate::api::build_router(state, "*"))
            .expect("Failed to start test server");

        let response = server.get("/api/v1/health").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["database"], "unavailable");
    }
}
