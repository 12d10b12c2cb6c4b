//! Common API utilities and shared types
//!
//! This module contains shared utilities used across multiple API endpoints.

use serde::{Deserialize, Deserializer};

// ============================================================================
// Pagination Defaults
// ============================================================================

/// Default page number (1-indexed)
pub fn default_page() -> u32 {
    1
}

// ============================================================================
// Nullable Fields
// ============================================================================

/// Deserialize a PATCH field that may be absent, `null`, or a value.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_nullable")]`:
/// absent stays `None`, `null` becomes `Some(None)`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Limit Query
// ============================================================================

/// `?limit=` for endpoints that return a top-N slice
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// Requested limit, or `default` when absent. Zero and negative values yield 0.
    pub fn resolve(&self, default: usize) -> usize {
        match self.limit {
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
            None => default,
        }
    }
}
