//! Database operations for the engine's `SQLite` store.
//!
//! ## Tables
//!
//! - `business` - Merchants, with a soft-delete flag
//! - `food_item` - Catalog entries, decimal-as-text prices, soft-delete flag
//! - `orders` - Order records with status codes and captured addresses
//! - `order_detail` - Immutable purchase-time snapshots
//! - `comment` - Business ratings
//! - `address` - Buyers' saved shipping addresses
//!
//! Every repository borrows an injected [`SqlitePool`]; nothing in the
//! engine holds a global connection. Migrations live in
//! `crates/engine/migrations/` and run through [`MIGRATOR`] or
//! `plateful migrate`.

pub mod addresses;
pub mod catalog;
pub mod comments;
pub mod orders;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use addresses::AddressRepository;
pub use catalog::CatalogRepository;
pub use comments::CommentRepository;
pub use orders::OrderRepository;

use crate::config::EngineConfig;

/// Embedded migrations for the engine schema.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A conditional status update found a different current status.
    #[error("status conflict: expected {expected}, found {actual}")]
    StatusConflict {
        /// The status the update required.
        expected: plateful_core::OrderStatus,
        /// The status actually present.
        actual: plateful_core::OrderStatus,
    },
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The acquire timeout bounds every repository call: a wedged store
/// surfaces as a persistence error instead of blocking indefinitely.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot
/// be established.
pub async fn create_pool(config: &EngineConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
}

/// Create an in-memory pool with migrations applied, for tests.
///
/// A single connection keeps every caller on the same in-memory database.
/// The same pragmas as [`create_pool`] apply, so constraint behavior
/// matches production.
///
/// # Errors
///
/// Returns `sqlx::Error` if the pool or migrations fail.
pub async fn create_test_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    Ok(pool)
}

/// Parse a decimal-as-text column, reporting corruption with context.
pub(crate) fn parse_price(raw: &str) -> Result<rust_decimal::Decimal, RepositoryError> {
    raw.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid price in database: {raw:?} ({e})"))
    })
}

/// Parse a persisted status code, reporting corruption with context.
pub(crate) fn parse_status(code: i64) -> Result<plateful_core::OrderStatus, RepositoryError> {
    plateful_core::OrderStatus::from_code(code)
        .map_err(|e| RepositoryError::DataCorruption(e.to_string()))
}
