//! Integration tests for Plateful.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p plateful-integration-tests
//! ```
//!
//! Each test builds its own in-memory `SQLite` database with migrations
//! applied, so tests are hermetic and need no external services.
//!
//! # Test Categories
//!
//! - `checkout` - Cart-to-order conversion and snapshot semantics
//! - `order_status` - Status machine transitions and conflicts
//! - `catalog_visibility` - Soft-delete cascades and search
//! - `comments` - Rating flow and the comment-driven transition
//! - `addresses` - Saved-address CRUD and by-value capture

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use plateful_core::{BusinessId, UserId};
use plateful_engine::db;
use plateful_engine::models::{Business, FoodItem};
use plateful_engine::{AddressService, CatalogService, OrderService};

/// Everything a scenario needs: one shared in-memory database and the
/// three services over it.
pub struct TestContext {
    pub pool: SqlitePool,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub addresses: AddressService,
}

impl TestContext {
    /// Build a fresh migrated in-memory database and services.
    ///
    /// # Panics
    ///
    /// Panics if the pool or migrations fail; tests cannot proceed
    /// without a database.
    pub async fn new() -> Self {
        let pool = db::create_test_pool()
            .await
            .expect("in-memory pool with migrations");
        Self {
            catalog: CatalogService::new(pool.clone()),
            orders: OrderService::new(pool.clone()),
            addresses: AddressService::new(pool.clone()),
            pool,
        }
    }

    /// Register a business with `items` priced food entries.
    ///
    /// # Panics
    ///
    /// Panics on persistence failure.
    pub async fn seed_business(&self, name: &str, items: &[(&str, &str)]) -> (Business, Vec<FoodItem>) {
        let business = self
            .catalog
            .register_business(name, "", "demo", None)
            .await
            .expect("register business");

        let mut foods = Vec::with_capacity(items.len());
        for (food_name, price) in items {
            let food = self
                .catalog
                .add_food(business.id, food_name, "", dec(price), None)
                .await
                .expect("add food");
            foods.push(food);
        }

        (business, foods)
    }

    /// Count rows in a table, for asserting that failed operations left
    /// nothing behind.
    ///
    /// # Panics
    ///
    /// Panics if the count query fails.
    pub async fn count_rows(&self, table: &str) -> i64 {
        // Table names come from the test, never user input.
        let sql = format!("SELECT COUNT(*) FROM {table}");
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .expect("count query")
    }
}

/// Parse a decimal literal.
///
/// # Panics
///
/// Panics on an invalid literal.
#[must_use]
pub fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

/// A fresh buyer ID.
#[must_use]
pub fn buyer() -> UserId {
    UserId::generate()
}

/// A business ID that exists nowhere.
#[must_use]
pub fn unknown_business() -> BusinessId {
    BusinessId::generate()
}
