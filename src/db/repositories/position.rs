//! Position repository
//!
//! Database operations for job positions.

use crate::db::repositories::{like_pattern, StoreResult};
use crate::db::DynDatabasePool;
use crate::models::{CreatePositionInput, Position, PositionFilter, UpdatePositionInput};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// Position repository trait
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Insert a new position with a fresh UUID
    async fn insert(&self, input: &CreatePositionInput) -> StoreResult<Position>;

    /// Get position by ID
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Position>>;

    /// List positions matching `filter`, newest first
    async fn find_many(&self, filter: &PositionFilter) -> StoreResult<Vec<Position>>;

    /// Case-insensitive substring search over title and description
    async fn search(&self, text: &str) -> StoreResult<Vec<Position>>;

    /// Apply a partial update, returning `None` if the position doesn't exist
    async fn update_by_id(&self, id: &str, input: &UpdatePositionInput) -> StoreResult<Option<Position>>;

    /// Delete a position, returning the removed record
    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Position>>;
}

/// SQLx-based position repository implementation
pub struct SqlxPositionRepository {
    pool: DynDatabasePool,
}

impl SqlxPositionRepository {
    /// Create a new SQLx position repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PositionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PositionRepository for SqlxPositionRepository {
    async fn insert(&self, input: &CreatePositionInput) -> StoreResult<Position> {
        insert_position_sqlite(self.pool.sqlite(), input).await
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Position>> {
        get_position_by_id_sqlite(self.pool.sqlite(), id).await
    }

    async fn find_many(&self, filter: &PositionFilter) -> StoreResult<Vec<Position>> {
        find_positions_sqlite(self.pool.sqlite(), filter).await
    }

    async fn search(&self, text: &str) -> StoreResult<Vec<Position>> {
        search_positions_sqlite(self.pool.sqlite(), text).await
    }

    async fn update_by_id(&self, id: &str, input: &UpdatePositionInput) -> StoreResult<Option<Position>> {
        update_position_sqlite(self.pool.sqlite(), id, input).await
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Option<Position>> {
        delete_position_sqlite(self.pool.sqlite(), id).await
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

const POSITION_COLUMNS: &str = "id, title, department, job_type, location, experience, description, requirements, created_at, updated_at";

async fn insert_position_sqlite(pool: &SqlitePool, input: &CreatePositionInput) -> StoreResult<Position> {
    let now = Utc::now();
    let requirements = serde_json::to_string(&input.requirements).context("Failed to encode requirements")?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO positions (id, title, department, job_type, location, experience, description, requirements, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        POSITION_COLUMNS
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(&input.title)
    .bind(&input.department)
    .bind(&input.job_type)
    .bind(&input.location)
    .bind(&input.experience)
    .bind(&input.description)
    .bind(&requirements)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create position")?;

    row_to_position_sqlite(&row)
}

async fn get_position_by_id_sqlite(pool: &SqlitePool, id: &str) -> StoreResult<Option<Position>> {
    let row = sqlx::query(&format!("SELECT {} FROM positions WHERE id = ?", POSITION_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get position by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_position_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn find_positions_sqlite(pool: &SqlitePool, filter: &PositionFilter) -> StoreResult<Vec<Position>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM positions WHERE 1 = 1", POSITION_COLUMNS));

    if let Some(ref department) = filter.department {
        qb.push(" AND department = ").push_bind(department.clone());
    }
    if let Some(ref job_type) = filter.job_type {
        qb.push(" AND job_type = ").push_bind(job_type.clone());
    }
    if let Some(ref location) = filter.location {
        qb.push(" AND location = ").push_bind(location.clone());
    }
    qb.push(" ORDER BY created_at DESC, rowid DESC");

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to list positions")?;

    rows.iter().map(row_to_position_sqlite).collect()
}

async fn search_positions_sqlite(pool: &SqlitePool, text: &str) -> StoreResult<Vec<Position>> {
    let pattern = like_pattern(text);

    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM positions
        WHERE title LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\'
        ORDER BY created_at DESC, rowid DESC
        "#,
        POSITION_COLUMNS
    ))
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await
    .context("Failed to search positions")?;

    rows.iter().map(row_to_position_sqlite).collect()
}

async fn update_position_sqlite(pool: &SqlitePool, id: &str, input: &UpdatePositionInput) -> StoreResult<Option<Position>> {
    if !input.has_changes() {
        return get_position_by_id_sqlite(pool, id).await;
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE positions SET updated_at = ");
    qb.push_bind(Utc::now());

    let text_fields = [
        ("title", &input.title),
        ("department", &input.department),
        ("job_type", &input.job_type),
        ("location", &input.location),
        ("experience", &input.experience),
        ("description", &input.description),
    ];
    for (column, value) in text_fields {
        if let Some(value) = value {
            qb.push(", ").push(column).push(" = ").push_bind(value.clone());
        }
    }
    if let Some(ref requirements) = input.requirements {
        let requirements = serde_json::to_string(requirements).context("Failed to encode requirements")?;
        qb.push(", requirements = ").push_bind(requirements);
    }

    qb.push(" WHERE id = ").push_bind(id.to_string());
    qb.push(" RETURNING ").push(POSITION_COLUMNS);

    let row = qb
        .build()
        .fetch_optional(pool)
        .await
        .context("Failed to update position")?;

    match row {
        Some(row) => Ok(Some(row_to_position_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn delete_position_sqlite(pool: &SqlitePool, id: &str) -> StoreResult<Option<Position>> {
    let row = sqlx::query(&format!("DELETE FROM positions WHERE id = ? RETURNING {}", POSITION_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to delete position")?;

    match row {
        Some(row) => Ok(Some(row_to_position_sqlite(&row)?)),
        None => Ok(None),
    }
}

fn row_to_position_sqlite(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Position> {
    let requirements: String = row.get("requirements");

    Ok(Position {
        id: row.get("id"),
        title: row.get("title"),
        department: row.get("department"),
        job_type: row.get("job_type"),
        location: row.get("location"),
        experience: row.get("experience"),
        description: row.get("description"),
        requirements: serde_json::from_str(&requirements).context("Invalid requirements column")?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
