//! Database migrations module
//!
//! Migrations are embedded directly in Rust code as SQL strings so the binary
//! carries its own schema.
//!
//! # Usage
//!
//! ```ignore
//! use devsite::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```
//!
//! Each migration is defined as a `Migration` struct containing:
//! - `version`: Unique version number for ordering
//! - `name`: Human-readable migration name
//! - `up`: SQL statements, separated by `;`

use anyhow::{Context, Result};
use std::collections::BTreeSet;

use super::DynDatabasePool;

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements
    pub up: &'static str,
}

/// All schema migrations, in application order.
pub const MIGRATIONS: &[Migration] = &[
    // Articles. Tag lists and the two tag mappings are JSON documents.
    Migration {
        version: 1,
        name: "create_articles",
        up: r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug VARCHAR(255) NOT NULL UNIQUE,
                title VARCHAR(500) NOT NULL,
                content TEXT NOT NULL,
                description TEXT NOT NULL,
                author VARCHAR(255) NOT NULL,
                category VARCHAR(64) NOT NULL,
                image_url TEXT,
                seo TEXT NOT NULL DEFAULT '{}',
                tags TEXT NOT NULL DEFAULT '[]',
                published INTEGER NOT NULL DEFAULT 0,
                tag_views TEXT NOT NULL DEFAULT '{}',
                related_tags TEXT NOT NULL DEFAULT '{}',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_articles_published ON articles(published);
            CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category);
            CREATE INDEX IF NOT EXISTS idx_articles_author ON articles(author);
            CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles(created_at);
        "#,
    },
    // Job positions, keyed by UUID.
    Migration {
        version: 2,
        name: "create_positions",
        up: r#"
            CREATE TABLE IF NOT EXISTS positions (
                id VARCHAR(36) PRIMARY KEY,
                title VARCHAR(500) NOT NULL,
                department VARCHAR(255) NOT NULL,
                job_type VARCHAR(64) NOT NULL,
                location VARCHAR(255) NOT NULL,
                experience VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                requirements TEXT NOT NULL DEFAULT '[]',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_positions_department ON positions(department);
            CREATE INDEX IF NOT EXISTS idx_positions_created_at ON positions(created_at);
        "#,
    },
];

/// Run all pending migrations
///
/// Each migration runs in its own transaction together with its
/// bookkeeping row, so a failed migration leaves no partial schema behind.
///
/// # Returns
///
/// Number of migrations applied
///
/// # Errors
///
/// Returns an error if any migration fails to apply
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;
    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect();

    for migration in &pending {
        tracing::info!(
            "Applying migration {}: {}",
            migration.version,
            migration.name
        );
        apply_migration(pool, migration)
            .await
            .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
    }

    if pending.is_empty() {
        tracing::debug!("No pending migrations");
    } else {
        tracing::info!("Applied {} migration(s)", pending.len());
    }

    Ok(pending.len())
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;
    Ok(())
}

/// Versions already recorded in `_migrations`
async fn applied_versions(pool: &DynDatabasePool) -> Result<BTreeSet<i32>> {
    let versions: Vec<i32> = sqlx::query_scalar("SELECT version FROM _migrations")
        .fetch_all(pool.sqlite())
        .await
        .context("Failed to read applied migrations")?;

    Ok(versions.into_iter().collect())
}

/// Apply a single migration and record it, atomically
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    let mut tx = pool
        .sqlite()
        .begin()
        .await
        .context("Failed to begin migration transaction")?;

    for statement in split_sql_statements(migration.up) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await
        .context("Failed to record migration")?;

    tx.commit().await.context("Failed to commit migration")?;
    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, skipping comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty() && !is_comment_only(stmt))
        .collect()
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    Ok(pending_count(pool).await? == 0)
}

/// Get pending migrations count
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;
    Ok(MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .count())
}

/// Get migration by version
pub fn get_migration(version: i32) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}
