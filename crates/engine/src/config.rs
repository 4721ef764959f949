//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATEFUL_DATABASE_URL` - `SQLite` connection string
//!   (e.g., `sqlite://plateful.db` or `sqlite::memory:`)
//!
//! ## Optional
//! - `PLATEFUL_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `PLATEFUL_ACQUIRE_TIMEOUT_SECS` - Connection acquire timeout in
//!   seconds (default: 10). Repository calls surface a timeout as a
//!   persistence error rather than blocking indefinitely.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// `SQLite` database connection URL
    pub database_url: String,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Bounded timeout for acquiring a pooled connection
    pub acquire_timeout: Duration,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `PLATEFUL_DATABASE_URL` is missing or a
    /// numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("PLATEFUL_DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("PLATEFUL_DATABASE_URL".to_owned()))?;

        let max_connections = parse_or(
            "PLATEFUL_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let acquire_timeout_secs = parse_or(
            "PLATEFUL_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), raw)),
        Err(_) => Ok(default),
    }
}
