//! Database connection pool abstraction
//!
//! The store handle is created once at startup and injected into every
//! repository. There is no global connection.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Database pool trait that abstracts over the connection handle.
///
/// Repositories only see this trait, so tests can hand them an in-memory
/// database built by [`create_test_pool`].
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Execute a raw SQL statement that doesn't return rows
    async fn execute(&self, query: &str) -> Result<u64>;

    /// Check that the store answers
    async fn ping(&self) -> Result<()>;

    /// Close every pooled connection
    async fn close(&self);

    /// Get the underlying SQLite pool
    fn sqlite(&self) -> &SqlitePool;
}

/// SQLite-backed store handle
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open a pool for the configured location
    ///
    /// `:memory:` (or `sqlite::memory:`) gives a private in-memory database
    /// shared by the connections of this pool only. A plain path is opened
    /// in WAL mode and created along with its parent directory when missing.
    /// A `sqlite:` URL is used as given.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(config)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {}", config.url))?;

        Ok(Self { pool })
    }
}

fn is_in_memory(url: &str) -> bool {
    url == ":memory:" || url == "sqlite::memory:"
}

fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions> {
    let url = config.url.trim();

    let options = if is_in_memory(url) {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else if url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
    } else {
        if let Some(parent) = std::path::Path::new(url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
            }
        }

        SqliteConnectOptions::new()
            .filename(url)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
    };

    Ok(options.busy_timeout(Duration::from_millis(config.busy_timeout_ms)))
}

#[async_trait]
impl DatabasePool for SqliteDatabase {
    async fn execute(&self, query: &str) -> Result<u64> {
        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to execute query: {}", query))?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn sqlite(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Type alias for a shared database pool handle
pub type DynDatabasePool = Arc<dyn DatabasePool>;

/// Create the store handle described by `config`
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DynDatabasePool> {
    let db = SqliteDatabase::connect(config).await?;
    Ok(Arc::new(db))
}

/// Create a fresh in-memory store for tests
pub async fn create_test_pool() -> Result<DynDatabasePool> {
    create_pool(&DatabaseConfig::in_memory()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory(":memory:"));
        assert!(is_in_memory("sqlite::memory:"));
        assert!(!is_in_memory("data/devsite.db"));
        assert!(!is_in_memory("sqlite:data/devsite.db"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = DatabaseConfig {
            url: "sqlite:site.db?mode=sideways".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(connect_options(&config).is_err());
    }

    #[tokio::test]
    async fn test_in_memory_pools_are_isolated() {
        let first = create_test_pool().await.expect("Failed to create pool");
        let second = create_test_pool().await.expect("Failed to create pool");

        first
            .execute("CREATE TABLE scratch (id INTEGER PRIMARY KEY)")
            .await
            .expect("Failed to create table");

        assert_eq!(
            first.execute("INSERT INTO scratch DEFAULT VALUES").await.expect("Failed to insert"),
            1
        );
        assert!(second.execute("INSERT INTO scratch DEFAULT VALUES").await.is_err());
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("dir").join("devsite.db");

        let config = DatabaseConfig {
            url: db_path.to_string_lossy().to_string(),
            max_connections: 2,
            ..DatabaseConfig::default()
        };

        let pool = create_pool(&config).await.expect("Failed to create pool");
        pool.ping().await.expect("Ping should succeed");
        pool.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        pool.ping().await.expect("Ping should succeed");

        pool.close().await;
        assert!(pool.ping().await.is_err());
    }
}
