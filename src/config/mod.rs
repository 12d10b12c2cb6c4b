//! Configuration management
//!
//! This module handles loading and parsing configuration for the Devsite API.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Article analytics configuration
    #[serde(default)]
    pub articles: ArticlesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin, `*` for any
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5002
}

fn default_cors_origin() -> String {
    "*".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL (`:memory:` for an in-memory store)
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Upper bound on pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            url: ":memory:".to_string(),
            ..Self::default()
        }
    }
}

fn default_database_url() -> String {
    "data/devsite.db".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Which articles are eligible as related-article / related-tag candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelatedScope {
    /// Any published article sharing a tag (default)
    #[default]
    Any,
    /// Only published articles in the seed article's category
    SameCategory,
}

impl RelatedScope {
    /// Parse a scope from its configuration spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "any" => Some(Self::Any),
            "same_category" | "same-category" => Some(Self::SameCategory),
            _ => None,
        }
    }
}

/// Article analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlesConfig {
    /// Candidate pool policy for related articles and related tags
    #[serde(default)]
    pub related_scope: RelatedScope,
    /// Default number of related articles returned
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
    /// Default number of popular tags returned
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
    /// Default page size for article lists
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            related_scope: RelatedScope::default(),
            related_limit: default_related_limit(),
            popular_limit: default_popular_limit(),
            page_size: default_page_size(),
        }
    }
}

fn default_related_limit() -> usize {
    3
}

fn default_popular_limit() -> usize {
    5
}

fn default_page_size() -> u32 {
    10
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - DEVSITE_SERVER_HOST
    /// - DEVSITE_SERVER_PORT
    /// - DEVSITE_SERVER_CORS_ORIGIN
    /// - DEVSITE_DATABASE_URL
    /// - DEVSITE_DATABASE_MAX_CONNECTIONS
    /// - DEVSITE_ARTICLES_RELATED_SCOPE
    /// - DEVSITE_ARTICLES_RELATED_LIMIT
    /// - DEVSITE_ARTICLES_POPULAR_LIMIT
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("DEVSITE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DEVSITE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("DEVSITE_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("DEVSITE_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(max) = std::env::var("DEVSITE_DATABASE_MAX_CONNECTIONS") {
            if let Ok(max) = max.parse::<u32>() {
                if max > 0 {
                    self.database.max_connections = max;
                }
            }
        }

        if let Ok(scope) = std::env::var("DEVSITE_ARTICLES_RELATED_SCOPE") {
            if let Some(scope) = RelatedScope::parse(&scope) {
                self.articles.related_scope = scope;
            }
        }
        if let Ok(limit) = std::env::var("DEVSITE_ARTICLES_RELATED_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.articles.related_limit = limit;
            }
        }
        if let Ok(limit) = std::env::var("DEVSITE_ARTICLES_POPULAR_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                self.articles.popular_limit = limit;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by every test module that touches process environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_KEYS: &[&str] = &[
    "DEVSITE_SERVER_HOST",
    "DEVSITE_SERVER_PORT",
    "DEVSITE_SERVER_CORS_ORIGIN",
    "DEVSITE_DATABASE_URL",
    "DEVSITE_DATABASE_MAX_CONNECTIONS",
    "DEVSITE_ARTICLES_RELATED_SCOPE",
    "DEVSITE_ARTICLES_RELATED_LIMIT",
    "DEVSITE_ARTICLES_POPULAR_LIMIT",
];

#[cfg(test)]
fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}
