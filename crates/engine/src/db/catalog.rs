//! Catalog repository: businesses, food items, and the visibility filter.
//!
//! The purchasable-catalog rule lives in exactly one place here
//! ([`VISIBLE_FOOD_SELECT`]): a food item qualifies iff neither it nor its
//! owning business is soft-deleted. Listing, search, and per-business
//! lookups all go through it, so the rule cannot drift between paths.
//! Historical order snapshots never consult this filter - and checkout
//! resolves items by existence ([`CatalogRepository::get_food`]), not
//! visibility.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plateful_core::{BusinessId, FoodId};

use super::{RepositoryError, parse_price};
use crate::models::{Business, FoodItem};

/// The single visibility predicate applied to every purchasable-catalog
/// read. Soft-deleting a business cascades through the join: its items
/// vanish even though their own flag is untouched.
const VISIBLE_FOOD_SELECT: &str = "\
    SELECT f.id, f.business_id, f.name, f.description, f.price, \
           f.image_ref, f.soft_deleted, f.created_at \
    FROM food_item f \
    JOIN business b ON b.id = f.business_id \
    WHERE f.soft_deleted = 0 AND b.soft_deleted = 0";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: BusinessId,
    name: String,
    description: String,
    category: String,
    image_ref: Option<String>,
    soft_deleted: bool,
    created_at: DateTime<Utc>,
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            image_ref: row.image_ref,
            soft_deleted: row.soft_deleted,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FoodRow {
    id: FoodId,
    business_id: BusinessId,
    name: String,
    description: String,
    price: String,
    image_ref: Option<String>,
    soft_deleted: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<FoodRow> for FoodItem {
    type Error = RepositoryError;

    fn try_from(row: FoodRow) -> Result<Self, Self::Error> {
        let price = parse_price(&row.price)?;

        Ok(Self {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            description: row.description,
            price,
            image_ref: row.image_ref,
            soft_deleted: row.soft_deleted,
            created_at: row.created_at,
        })
    }
}

/// Escape `%`, `_`, and the escape character itself for a LIKE pattern.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for businesses and their food catalogs.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a business row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_business(&self, business: &Business) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO business (id, name, description, category, image_ref, soft_deleted, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(business.id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.category)
        .bind(&business.image_ref)
        .bind(business.soft_deleted)
        .bind(business.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a business by ID regardless of its soft-delete flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_business(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(
            "SELECT id, name, description, category, image_ref, soft_deleted, created_at \
             FROM business WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List businesses that have not been withdrawn, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_visible_businesses(&self) -> Result<Vec<Business>, RepositoryError> {
        let rows = sqlx::query_as::<_, BusinessRow>(
            "SELECT id, name, description, category, image_ref, soft_deleted, created_at \
             FROM business WHERE soft_deleted = 0 ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Flag a business as withdrawn. Its food items disappear from the
    /// visible catalog through the join; their own flags stay untouched
    /// and historical order data is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the business doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete_business(&self, id: BusinessId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE business SET soft_deleted = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Insert a food item row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_food(&self, food: &FoodItem) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO food_item (id, business_id, name, description, price, image_ref, soft_deleted, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(food.id)
        .bind(food.business_id)
        .bind(&food.name)
        .bind(&food.description)
        .bind(food.price.to_string())
        .bind(&food.image_ref)
        .bind(food.soft_deleted)
        .bind(food.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a food item by ID regardless of visibility.
    ///
    /// This is the checkout-time lookup: existence, not visibility, is the
    /// snapshot condition. An item soft-deleted after being added to a
    /// cart is still snapshot-able.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the price is invalid.
    pub async fn get_food(&self, id: FoodId) -> Result<Option<FoodItem>, RepositoryError> {
        let row = sqlx::query_as::<_, FoodRow>(
            "SELECT id, business_id, name, description, price, image_ref, soft_deleted, created_at \
             FROM food_item WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Update a food item's merchant-editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_food(
        &self,
        id: FoodId,
        name: &str,
        description: &str,
        price: rust_decimal::Decimal,
        image_ref: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE food_item SET name = ?, description = ?, price = ?, image_ref = ? WHERE id = ?",
        )
        .bind(name)
        .bind(description)
        .bind(price.to_string())
        .bind(image_ref)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Flag a food item as withdrawn from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn soft_delete_food(&self, id: FoodId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE food_item SET soft_deleted = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List the purchasable catalog, optionally scoped to one business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any price is invalid.
    pub async fn list_visible(
        &self,
        business_id: Option<BusinessId>,
    ) -> Result<Vec<FoodItem>, RepositoryError> {
        let rows = match business_id {
            Some(business_id) => {
                let sql = format!("{VISIBLE_FOOD_SELECT} AND f.business_id = ? ORDER BY f.created_at ASC");
                sqlx::query_as::<_, FoodRow>(&sql)
                    .bind(business_id)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!("{VISIBLE_FOOD_SELECT} ORDER BY f.created_at ASC");
                sqlx::query_as::<_, FoodRow>(&sql).fetch_all(self.pool).await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Search the purchasable catalog by name, optionally scoped to one
    /// business. The same visibility predicate as listing applies.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any price is invalid.
    pub async fn search_visible(
        &self,
        query: &str,
        business_id: Option<BusinessId>,
    ) -> Result<Vec<FoodItem>, RepositoryError> {
        let pattern = like_pattern(query);

        let rows = match business_id {
            Some(business_id) => {
                let sql = format!(
                    "{VISIBLE_FOOD_SELECT} AND f.name LIKE ? ESCAPE '\\' AND f.business_id = ? \
                     ORDER BY f.created_at ASC"
                );
                sqlx::query_as::<_, FoodRow>(&sql)
                    .bind(&pattern)
                    .bind(business_id)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{VISIBLE_FOOD_SELECT} AND f.name LIKE ? ESCAPE '\\' ORDER BY f.created_at ASC"
                );
                sqlx::query_as::<_, FoodRow>(&sql)
                    .bind(&pattern)
                    .fetch_all(self.pool)
                    .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50% off_deal"), "%50\\% off\\_deal%");
        assert_eq!(like_pattern("plain"), "%plain%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
