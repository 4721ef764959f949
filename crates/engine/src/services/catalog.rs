//! Catalog service: the purchasable catalog and merchant catalog edits.
//!
//! Every listing and search path goes through the repository's single
//! visibility predicate. Withdrawals are soft deletes: rows stay in place
//! so historical order snapshots keep resolving.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use plateful_core::{BusinessId, FoodId};

use crate::cart::Cart;
use crate::db::{CatalogRepository, CommentRepository};
use crate::error::EngineError;
use crate::models::{Business, Comment, FoodItem};

/// Catalog reads and merchant-side catalog management.
#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    /// Create a new catalog service over an injected pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new business.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the insert fails.
    #[instrument(skip(self, description, image_ref))]
    pub async fn register_business(
        &self,
        name: &str,
        description: &str,
        category: &str,
        image_ref: Option<String>,
    ) -> Result<Business, EngineError> {
        let business = Business::new(name, description, category, image_ref);
        CatalogRepository::new(&self.pool)
            .insert_business(&business)
            .await
            .map_err(EngineError::Persistence)?;

        info!(business_id = %business.id, "registered business");
        Ok(business)
    }

    /// List businesses that are open for ordering.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn list_businesses(&self) -> Result<Vec<Business>, EngineError> {
        CatalogRepository::new(&self.pool)
            .list_visible_businesses()
            .await
            .map_err(EngineError::Persistence)
    }

    /// Withdraw a business. All of its food items disappear from the
    /// visible catalog through the join-time cascade; historical order
    /// data is untouched.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the business doesn't exist.
    /// Returns `EngineError::Persistence` for other store failures.
    #[instrument(skip(self))]
    pub async fn withdraw_business(&self, business_id: BusinessId) -> Result<(), EngineError> {
        CatalogRepository::new(&self.pool)
            .soft_delete_business(business_id)
            .await
            .map_err(|e| EngineError::from_repository(e, "business", business_id.to_string()))?;

        info!(%business_id, "withdrew business from catalog");
        Ok(())
    }

    /// Add a food item to a business's catalog.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the business doesn't exist.
    /// Returns `EngineError::Persistence` for other store failures.
    #[instrument(skip(self, description, image_ref))]
    pub async fn add_food(
        &self,
        business_id: BusinessId,
        name: &str,
        description: &str,
        price: Decimal,
        image_ref: Option<String>,
    ) -> Result<FoodItem, EngineError> {
        let repo = CatalogRepository::new(&self.pool);

        repo.get_business(business_id)
            .await
            .map_err(EngineError::Persistence)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "business",
                id: business_id.to_string(),
            })?;

        let food = FoodItem::new(business_id, name, description, price, image_ref);
        repo.insert_food(&food).await.map_err(EngineError::Persistence)?;

        info!(food_id = %food.id, %business_id, "added food item");
        Ok(food)
    }

    /// Edit a food item's name, description, price, or image.
    ///
    /// Past orders are unaffected: their snapshots were copied at
    /// purchase time.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the item doesn't exist.
    /// Returns `EngineError::Persistence` for other store failures.
    #[instrument(skip(self, description, image_ref))]
    pub async fn update_food(
        &self,
        food_id: FoodId,
        name: &str,
        description: &str,
        price: Decimal,
        image_ref: Option<&str>,
    ) -> Result<FoodItem, EngineError> {
        let repo = CatalogRepository::new(&self.pool);

        repo.update_food(food_id, name, description, price, image_ref)
            .await
            .map_err(|e| EngineError::from_repository(e, "food item", food_id.to_string()))?;

        repo.get_food(food_id)
            .await
            .map_err(EngineError::Persistence)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "food item",
                id: food_id.to_string(),
            })
    }

    /// Withdraw a food item from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the item doesn't exist.
    /// Returns `EngineError::Persistence` for other store failures.
    #[instrument(skip(self))]
    pub async fn withdraw_food(&self, food_id: FoodId) -> Result<(), EngineError> {
        CatalogRepository::new(&self.pool)
            .soft_delete_food(food_id)
            .await
            .map_err(|e| EngineError::from_repository(e, "food item", food_id.to_string()))?;

        info!(%food_id, "withdrew food item from catalog");
        Ok(())
    }

    /// List the purchasable catalog, optionally scoped to one business.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn list_visible_food(
        &self,
        business_id: Option<BusinessId>,
    ) -> Result<Vec<FoodItem>, EngineError> {
        CatalogRepository::new(&self.pool)
            .list_visible(business_id)
            .await
            .map_err(EngineError::Persistence)
    }

    /// Search the purchasable catalog by name.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn search_visible_food(
        &self,
        query: &str,
        business_id: Option<BusinessId>,
    ) -> Result<Vec<FoodItem>, EngineError> {
        CatalogRepository::new(&self.pool)
            .search_visible(query, business_id)
            .await
            .map_err(EngineError::Persistence)
    }

    /// Open a cart for one business, seeded from its visible catalog with
    /// every item at quantity zero.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the catalog read fails.
    pub async fn open_cart(&self, business_id: BusinessId) -> Result<Cart, EngineError> {
        let items = self.list_visible_food(Some(business_id)).await?;
        Ok(Cart::new(business_id, &items))
    }

    /// List a business's comments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn list_comments(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<Comment>, EngineError> {
        CommentRepository::new(&self.pool)
            .list_for_business(business_id)
            .await
            .map_err(EngineError::Persistence)
    }

    /// Average comment score for a business, or `None` with no comments.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn average_score(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<Decimal>, EngineError> {
        CommentRepository::new(&self.pool)
            .average_score(business_id)
            .await
            .map_err(EngineError::Persistence)
    }
}
