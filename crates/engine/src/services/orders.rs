//! Order service: checkout, status transitions, and comment submission.
//!
//! This is the only path that creates a persisted order. Validation runs
//! before any write; the order row and its snapshots are persisted in one
//! transaction; status changes are conditional updates that lose loudly.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use plateful_core::{
    BusinessId, DetailGroupId, OrderAction, OrderId, OrderStatus, Score, ShippingAddress, UserId,
};

use crate::cart::{Cart, CartLine};
use crate::db::{CatalogRepository, OrderRepository, RepositoryError};
use crate::error::EngineError;
use crate::models::{Comment, Order, OrderBucket, OrderDetail};

/// Checkout, the order status machine, and order history reads.
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    /// Create a new order service over an injected pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert a validated cart into a persisted order.
    ///
    /// Preconditions, each with its own error: at least one line with
    /// quantity above zero, and a complete shipping address (enforced by
    /// [`ShippingAddress`] construction at the call site). Every line's
    /// food item must still *exist* - visibility does not matter, so an
    /// item soft-deleted after being added to the cart still snapshots.
    ///
    /// The order row and every detail snapshot persist atomically; a
    /// failure reports a single persistence error and leaves no partial
    /// order behind.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EmptyCart` if no line has quantity above zero.
    /// Returns `EngineError::NotFound` if a food item no longer exists.
    /// Returns `EngineError::Persistence` if the store write fails.
    #[instrument(skip(self, address, lines))]
    pub async fn checkout(
        &self,
        user_id: UserId,
        business_id: BusinessId,
        address: ShippingAddress,
        lines: &[CartLine],
    ) -> Result<Order, EngineError> {
        let lines: Vec<CartLine> = lines.iter().filter(|l| l.quantity > 0).copied().collect();
        if lines.is_empty() {
            return Err(EngineError::EmptyCart);
        }

        let catalog = CatalogRepository::new(&self.pool);
        let group = DetailGroupId::generate();
        let mut details = Vec::with_capacity(lines.len());
        for line in &lines {
            let food = catalog
                .get_food(line.food_id)
                .await
                .map_err(EngineError::Persistence)?
                .ok_or_else(|| EngineError::NotFound {
                    entity: "food item",
                    id: line.food_id.to_string(),
                })?;
            details.push(OrderDetail::snapshot(group, &food, line.quantity));
        }

        let order = Order {
            id: OrderId::generate(),
            created_at: Utc::now(),
            business_id,
            user_id,
            detail_group_id: group,
            status: OrderStatus::Unhandled,
            address,
            details,
        };

        OrderRepository::new(&self.pool)
            .create_with_details(&order)
            .await
            .map_err(EngineError::Persistence)?;

        info!(
            order_id = %order.id,
            %business_id,
            total = %order.total(),
            lines = order.details.len(),
            "checked out order"
        );
        Ok(order)
    }

    /// Checkout convenience over a session cart: reads its lines, persists
    /// the order, and clears the cart only on success.
    ///
    /// # Errors
    ///
    /// Same as [`Self::checkout`]; the cart is left untouched on failure.
    pub async fn checkout_cart(
        &self,
        user_id: UserId,
        address: ShippingAddress,
        cart: &mut Cart,
    ) -> Result<Order, EngineError> {
        let order = self
            .checkout(user_id, cart.business_id(), address, &cart.lines())
            .await?;
        cart.clear();
        Ok(order)
    }

    /// Fetch an order with its immutable detail snapshots.
    ///
    /// This read bypasses the catalog visibility filter entirely: the
    /// snapshots resolve even when their source food items or business
    /// have been soft-deleted since.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the order doesn't exist.
    /// Returns `EngineError::Persistence` for store failures.
    pub async fn fetch_order(&self, order_id: OrderId) -> Result<Order, EngineError> {
        OrderRepository::new(&self.pool)
            .get(order_id)
            .await
            .map_err(EngineError::Persistence)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "order",
                id: order_id.to_string(),
            })
    }

    /// A buyer's orders in the given bucket, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        bucket: OrderBucket,
    ) -> Result<Vec<Order>, EngineError> {
        OrderRepository::new(&self.pool)
            .list_for_user(user_id, bucket)
            .await
            .map_err(EngineError::Persistence)
    }

    /// A merchant's orders in the given bucket, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
        bucket: OrderBucket,
    ) -> Result<Vec<Order>, EngineError> {
        OrderRepository::new(&self.pool)
            .list_for_business(business_id, bucket)
            .await
            .map_err(EngineError::Persistence)
    }

    /// Apply a merchant action (`Cancel` or `Complete`) to an order.
    ///
    /// The update is conditional on the status the action requires; a
    /// concurrent double-action loses with a conflict carrying the actual
    /// current status, never a silent overwrite.
    ///
    /// `Comment` is rejected here: the `Finished` to `FinishedCommented`
    /// move only happens together with a persisted comment row, through
    /// [`Self::submit_comment`].
    ///
    /// # Errors
    ///
    /// Returns `EngineError::CommentRequired` for the `Comment` action.
    /// Returns `EngineError::NotFound` if the order doesn't exist.
    /// Returns `EngineError::Conflict` if the order has already moved.
    /// Returns `EngineError::Persistence` for store failures.
    #[instrument(skip(self))]
    pub async fn transition_order(
        &self,
        order_id: OrderId,
        action: OrderAction,
    ) -> Result<Order, EngineError> {
        if action == OrderAction::Comment {
            return Err(EngineError::CommentRequired(order_id.to_string()));
        }

        let order = OrderRepository::new(&self.pool)
            .transition(order_id, action)
            .await
            .map_err(|e| Self::map_transition_error(e, order_id, action))?;

        info!(%order_id, %action, status = %order.status, "order transitioned");
        Ok(order)
    }

    /// Rate a finished order: persist the comment row and advance the
    /// order to `FinishedCommented` atomically.
    ///
    /// If the comment insert fails the status does not change; if the
    /// conditional transition loses a race the comment row is rolled back
    /// with it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidScore` for a score outside 1-5.
    /// Returns `EngineError::NotFound` if the order doesn't exist.
    /// Returns `EngineError::Conflict` if the order is not `Finished`.
    /// Returns `EngineError::Persistence` for store failures.
    #[instrument(skip(self, content, image_ref))]
    pub async fn submit_comment(
        &self,
        order_id: OrderId,
        content: &str,
        score: i64,
        image_ref: Option<String>,
    ) -> Result<Comment, EngineError> {
        let score = Score::new(score)?;
        let order = self.fetch_order(order_id).await?;

        let comment = Comment::new(order.user_id, order.business_id, content, score, image_ref);
        OrderRepository::new(&self.pool)
            .finalize_comment(&comment, order_id)
            .await
            .map_err(|e| Self::map_transition_error(e, order_id, OrderAction::Comment))?;

        info!(%order_id, comment_id = %comment.id, score = %score, "order rated");
        Ok(comment)
    }

    fn map_transition_error(
        err: RepositoryError,
        order_id: OrderId,
        action: OrderAction,
    ) -> EngineError {
        match err {
            RepositoryError::NotFound => EngineError::NotFound {
                entity: "order",
                id: order_id.to_string(),
            },
            RepositoryError::StatusConflict { expected, actual } => {
                warn!(%order_id, %action, %expected, %actual, "status transition conflict");
                EngineError::Conflict {
                    order_id: order_id.to_string(),
                    action,
                    expected,
                    actual,
                }
            }
            other => EngineError::Persistence(other),
        }
    }
}
