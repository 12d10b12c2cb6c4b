//! Position API endpoints
//!
//! - GET /api/v1/positions - List positions (department, type, location filters)
//! - POST /api/v1/positions - Create position
//! - GET /api/v1/positions/search?q= - Search title and description
//! - GET /api/v1/positions/{id} - Get position
//! - PATCH /api/v1/positions/{id} - Update position
//! - DELETE /api/v1/positions/{id} - Delete position, returning it

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreatePositionInput, Position, PositionFilter, UpdatePositionInput};

/// Query parameters for listing positions
#[derive(Debug, Deserialize)]
pub struct ListPositionsQuery {
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub location: Option<String>,
}

/// Query parameters for position search
#[derive(Debug, Deserialize)]
pub struct SearchPositionsQuery {
    #[serde(default)]
    pub q: String,
}

/// Build the positions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/positions", get(list_positions).post(create_position))
        .route("/positions/search", get(search_positions))
        .route(
            "/positions/{id}",
            get(get_position).patch(update_position).delete(delete_position),
        )
}

/// GET /api/v1/positions
pub async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<ListPositionsQuery>,
) -> Result<Json<Vec<Position>>, ApiError> {
    let positions = if query.job_type.is_none() && query.location.is_none() {
        state.position_service.find_all(query.department).await?
    } else {
        let filter = PositionFilter::new(query.department, query.job_type, query.location);
        state.position_service.find_by_filters(&filter).await?
    };

    Ok(Json(positions))
}

/// POST /api/v1/positions
pub async fn create_position(
    State(state): State<AppState>,
    Json(body): Json<CreatePositionInput>,
) -> Result<(StatusCode, Json<Position>), ApiError> {
    let position = state.position_service.create(body).await?;

    Ok((StatusCode::CREATED, Json(position)))
}

/// GET /api/v1/positions/search
pub async fn search_positions(
    State(state): State<AppState>,
    Query(query): Query<SearchPositionsQuery>,
) -> Result<Json<Vec<Position>>, ApiError> {
    Ok(Json(state.position_service.search(&query.q).await?))
}

/// GET /api/v1/positions/{id}
pub async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Position>, ApiError> {
    Ok(Json(state.position_service.find_one(&id).await?))
}

/// PATCH /api/v1/positions/{id}
pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePositionInput>,
) -> Result<Json<Position>, ApiError> {
    Ok(Json(state.position_service.update(&id, body).await?))
}

/// DELETE /api/v1/positions/{id}
pub async fn delete_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Position>, ApiError> {
    Ok(Json(state.position_service.remove(&id).await?))
}

#[cfg(test)]
mod tests {
    use crate::api::tests::test_server;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn position_body(title: &str, department: &str, job_type: &str) -> Value {
        json!({
            "title": title,
            "department": department,
            "type": job_type,
            "location": "Remote",
            "experience": "3+ years",
            "description": format!("Join us as {}", title),
            "requirements": ["Curiosity"],
        })
    }

    #[tokio::test]
    async fn test_position_lifecycle() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/positions")
            .json(&position_body("Rust Engineer", "Engineering", "Full-time"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["type"], "Full-time");

        let fetched: Value = server.get(&format!("/api/v1/positions/{}", id)).await.json();
        assert_eq!(fetched["title"], "Rust Engineer");

        let response = server
            .patch(&format!("/api/v1/positions/{}", id))
            .json(&json!({"location": "Berlin"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let updated: Value = response.json();
        assert_eq!(updated["location"], "Berlin");

        let response = server.delete(&format!("/api/v1/positions/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let removed: Value = response.json();
        assert_eq!(removed["id"], id.as_str());

        let response = server.get(&format!("/api/v1/positions/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_position_filters_and_search() {
        let server = test_server().await;
        for (title, department, job_type) in [
            ("Rust Engineer", "Engineering", "Full-time"),
            ("Designer", "Design", "Contract"),
            ("SRE", "Engineering", "Contract"),
        ] {
            server
                .post("/api/v1/positions")
                .json(&position_body(title, department, job_type))
                .await;
        }

        let all: Value = server
            .get("/api/v1/positions")
            .add_query_param("department", "all")
            .await
            .json();
        assert_eq!(all.as_array().unwrap().len(), 3);

        let engineering: Value = server
            .get("/api/v1/positions")
            .add_query_param("department", "Engineering")
            .add_query_param("type", "Contract")
            .await
            .json();
        assert_eq!(engineering.as_array().unwrap().len(), 1);
        assert_eq!(engineering[0]["title"], "SRE");

        let found: Value = server
            .get("/api/v1/positions/search")
            .add_query_param("q", "rust")
            .await
            .json();
        assert_eq!(found.as_array().unwrap().len(), 1);

        let response = server.get("/api/v1/positions/search").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_position_requires_requirements() {
        let server = test_server().await;
        let mut body = position_body("Rust Engineer", "Engineering", "Full-time");
        body["requirements"] = json!([]);

        let response = server.post("/api/v1/positions").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
