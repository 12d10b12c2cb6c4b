//! API middleware
//!
//! Contains:
//! - Shared application state
//! - Request statistics
//! - The JSON error envelope and the mapping from service errors

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::models::Category;
use crate::services::{ArticleService, ArticleServiceError, PositionService, PositionServiceError};

// ============================================================================
// Request Statistics
// ============================================================================

/// Lightweight request statistics using atomic operations (no locks)
pub struct RequestStats {
    /// Total number of requests processed
    total_requests: AtomicU64,
    /// Total response time in microseconds (for calculating average)
    total_response_time_us: AtomicU64,
    /// Application start time
    start_time: Instant,
}

impl RequestStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request with its response time
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us.fetch_add(duration_us, Ordering::Relaxed);
    }

    /// Get total request count
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Get average response time in microseconds
    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);
        total_time as f64 / total as f64
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: crate::db::DynDatabasePool,
    pub article_service: Arc<ArticleService>,
    pub position_service: Arc<PositionService>,
    pub request_stats: Arc<RequestStats>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(field: &str, value: &str, message: impl Into<String>) -> Self {
        Self::with_details(
            "CONFLICT",
            message,
            serde_json::json!({"field": field, "value": value}),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ArticleServiceError> for ApiError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::NotFound(slug) => {
                ApiError::not_found(format!("Article not found: {}", slug))
            }
            ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ArticleServiceError::DuplicateSlug(slug) => ApiError::conflict(
                "slug",
                &slug,
                format!("Article slug already exists: {}", slug),
            ),
            ArticleServiceError::InvalidCategory(category) => ApiError::with_details(
                "VALIDATION_ERROR",
                format!(
                    "Invalid category: {}. Allowed: {}",
                    category,
                    Category::allowed_values()
                ),
                serde_json::json!({"field": "category", "allowed": Category::ALL}),
            ),
            ArticleServiceError::InternalError(e) => {
                tracing::error!("Article request failed: {:#}", e);
                ApiError::internal_error(e.to_string())
            }
        }
    }
}

impl From<PositionServiceError> for ApiError {
    fn from(err: PositionServiceError) -> Self {
        match err {
            PositionServiceError::NotFound(id) => {
                ApiError::not_found(format!("Position not found: {}", id))
            }
            PositionServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            PositionServiceError::InternalError(e) => {
                tracing::error!("Position request failed: {:#}", e);
                ApiError::internal_error(e.to_string())
            }
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Request statistics middleware
///
/// Records request count and response time for the health endpoint.
pub async fn request_stats_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let response = next.run(request).await;

    // Microseconds for precision
    let duration_us = start.elapsed().as_micros() as u64;
    state.request_stats.record(duration_us);

    response
}
