//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the document-style operations for one collection.

pub mod article;
pub mod position;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use position::{PositionRepository, SqlxPositionRepository};

/// Errors surfaced by the storage layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key (article slug) is already taken
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The store could not complete the operation
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Result type for repository operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Classify a failed write, turning unique constraint violations into
/// [`StoreError::DuplicateKey`].
pub(crate) fn map_write_error(err: sqlx::Error, key: &str, context: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateKey(key.to_string());
        }
    }
    StoreError::Unavailable(anyhow::Error::new(err).context(context))
}

/// Build a `LIKE` pattern matching `text` as a literal substring.
///
/// Use together with `ESCAPE '\'`.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
