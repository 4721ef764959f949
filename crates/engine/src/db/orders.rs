//! Order repository: transactional checkout persistence and the
//! conditional status machine.
//!
//! Two rules are enforced here and nowhere else:
//!
//! - The order row and its detail snapshots are written inside a single
//!   transaction. No other operation can observe a partially-written
//!   order; a failed detail insert rolls the whole checkout back.
//! - Status changes are optimistic conditional updates: `SET status = new
//!   WHERE id = ? AND status = expected`. Zero rows affected means another
//!   actor won the race, reported as a conflict with the actual current
//!   status - never silently overwritten.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plateful_core::{
    BusinessId, DetailGroupId, FoodId, OrderAction, OrderId, ShippingAddress, UserId,
};

use super::{RepositoryError, parse_price, parse_status};
use crate::models::{Comment, Order, OrderBucket, OrderDetail};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    created_at: DateTime<Utc>,
    business_id: BusinessId,
    user_id: UserId,
    detail_group_id: DetailGroupId,
    status: i64,
    address: String,
}

impl OrderRow {
    fn into_order(self, details: Vec<OrderDetail>) -> Result<Order, RepositoryError> {
        Ok(Order {
            id: self.id,
            created_at: self.created_at,
            business_id: self.business_id,
            user_id: self.user_id,
            detail_group_id: self.detail_group_id,
            status: parse_status(self.status)?,
            address: ShippingAddress::from_column(&self.address),
            details,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DetailRow {
    detail_group_id: DetailGroupId,
    food_id: FoodId,
    name: String,
    description: String,
    price: String,
    quantity: i64,
    image_ref: Option<String>,
}

impl TryFrom<DetailRow> for OrderDetail {
    type Error = RepositoryError;

    fn try_from(row: DetailRow) -> Result<Self, Self::Error> {
        let price = parse_price(&row.price)?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid quantity in database: {}",
                row.quantity
            ))
        })?;

        Ok(Self {
            detail_group_id: row.detail_group_id,
            food_id: row.food_id,
            name: row.name,
            description: row.description,
            price,
            quantity,
            image_ref: row.image_ref,
        })
    }
}

const SELECT_ORDER: &str = "\
    SELECT id, created_at, business_id, user_id, detail_group_id, status, address \
    FROM orders";

const SELECT_DETAILS: &str = "\
    SELECT detail_group_id, food_id, name, description, price, quantity, image_ref \
    FROM order_detail WHERE detail_group_id = ? ORDER BY rowid ASC";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order persistence and status transitions.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist an order and all of its detail snapshots atomically.
    ///
    /// The transaction commits only after every detail insert succeeds;
    /// any failure rolls back the order row too, so the merchant can never
    /// see a half-created order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails (the whole
    /// checkout is rolled back).
    pub async fn create_with_details(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, created_at, business_id, user_id, detail_group_id, status, address) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id)
        .bind(order.created_at)
        .bind(order.business_id)
        .bind(order.user_id)
        .bind(order.detail_group_id)
        .bind(order.status.code())
        .bind(order.address.to_column())
        .execute(&mut *tx)
        .await?;

        for detail in &order.details {
            sqlx::query(
                "INSERT INTO order_detail (id, detail_group_id, food_id, name, description, price, quantity, image_ref) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(detail.detail_group_id)
            .bind(detail.food_id)
            .bind(&detail.name)
            .bind(&detail.description)
            .bind(detail.price.to_string())
            .bind(i64::from(detail.quantity))
            .bind(&detail.image_ref)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetch an order with its detail snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("{SELECT_ORDER} WHERE id = ?");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => {
                let details = self.details_for(row.detail_group_id).await?;
                row.into_order(details).map(Some)
            }
            None => Ok(None),
        }
    }

    /// List a buyer's orders in the given bucket, newest first, details
    /// included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        bucket: OrderBucket,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "{SELECT_ORDER} WHERE user_id = ? AND status IN ({}) ORDER BY created_at DESC",
            status_list(bucket)
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        self.attach_details(rows).await
    }

    /// List a merchant's orders in the given bucket, newest first, details
    /// included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
        bucket: OrderBucket,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "{SELECT_ORDER} WHERE business_id = ? AND status IN ({}) ORDER BY created_at DESC",
            status_list(bucket)
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(business_id)
            .fetch_all(self.pool)
            .await?;

        self.attach_details(rows).await
    }

    /// Apply a status action with an optimistic conditional update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::StatusConflict` if the order is not in
    /// the status the action requires (the losing side of a race).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn transition(
        &self,
        id: OrderId,
        action: OrderAction,
    ) -> Result<Order, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(action.target_status().code())
            .bind(id)
            .bind(action.required_status().code())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.explain_failed_update(id, action).await?);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Persist a comment and advance its order `Finished` to
    /// `FinishedCommented` in one transaction.
    ///
    /// If the conditional status update loses a race, the comment insert
    /// is rolled back too: the status must not change unless the comment
    /// persisted, and a comment must not exist for an order that was never
    /// marked as commented.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::StatusConflict` if the order is not
    /// `Finished`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn finalize_comment(
        &self,
        comment: &Comment,
        order_id: OrderId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO comment (id, user_id, business_id, content, score, image_ref, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(comment.id)
        .bind(comment.user_id)
        .bind(comment.business_id)
        .bind(&comment.content)
        .bind(i64::from(comment.score.value()))
        .bind(&comment.image_ref)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await?;

        let action = OrderAction::Comment;
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(action.target_status().code())
            .bind(order_id)
            .bind(action.required_status().code())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // The comment insert must not survive a failed transition.
            tx.rollback().await?;
            return Err(self.explain_failed_update(order_id, action).await?);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Distinguish not-found from conflict after a conditional update
    /// matched zero rows, reporting the actual current status.
    async fn explain_failed_update(
        &self,
        id: OrderId,
        action: OrderAction,
    ) -> Result<RepositoryError, RepositoryError> {
        let actual = sqlx::query_scalar::<_, i64>("SELECT status FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match actual {
            None => Ok(RepositoryError::NotFound),
            Some(code) => Ok(RepositoryError::StatusConflict {
                expected: action.required_status(),
                actual: parse_status(code)?,
            }),
        }
    }

    async fn details_for(
        &self,
        group: DetailGroupId,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, DetailRow>(SELECT_DETAILS)
            .bind(group)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn attach_details(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let details = self.details_for(row.detail_group_id).await?;
            orders.push(row.into_order(details)?);
        }
        Ok(orders)
    }
}

/// Render a bucket's status codes as a SQL IN-list. The codes are
/// compile-time constants, never user input.
fn status_list(bucket: OrderBucket) -> String {
    bucket
        .status_codes()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_list_renders_bucket_codes() {
        assert_eq!(status_list(OrderBucket::Open), "1");
        assert_eq!(status_list(OrderBucket::Settled), "2, 3, 4");
    }
}
