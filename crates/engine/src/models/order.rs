//! Order and order-detail domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plateful_core::{
    BusinessId, DetailGroupId, FoodId, OrderId, OrderStatus, ShippingAddress, UserId, pricing,
};

use super::FoodItem;

/// A persisted order: created once at checkout, status-mutated afterward,
/// never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// When the buyer checked out.
    pub created_at: DateTime<Utc>,
    /// The merchant the order was placed with.
    pub business_id: BusinessId,
    /// The buyer.
    pub user_id: UserId,
    /// Groups this order's detail snapshots.
    pub detail_group_id: DetailGroupId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Shipping address captured by value at checkout.
    pub address: ShippingAddress,
    /// Purchase-time snapshots, one per cart line with quantity > 0.
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Total over the detail snapshots, recomputed from scratch.
    ///
    /// This equals the cart's last running total as long as no price
    /// changed between cart mutation and checkout, and it never changes
    /// afterward: the snapshots are immutable.
    #[must_use]
    pub fn total(&self) -> Decimal {
        pricing::order_total(self.details.iter().map(|d| (d.price, d.quantity)))
    }
}

/// An immutable purchase-time snapshot of one food item.
///
/// Later edits to the source [`FoodItem`] (price change, soft-delete) never
/// retroactively alter these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// The group this snapshot belongs to.
    pub detail_group_id: DetailGroupId,
    /// The food item this snapshot was taken from.
    pub food_id: FoodId,
    /// Name at purchase time.
    pub name: String,
    /// Description at purchase time.
    pub description: String,
    /// Unit price at purchase time. Exact decimal.
    pub price: Decimal,
    /// Purchased quantity. Always > 0.
    pub quantity: u32,
    /// Image reference at purchase time, if any.
    pub image_ref: Option<String>,
}

impl OrderDetail {
    /// Snapshot a food item at the given quantity.
    #[must_use]
    pub fn snapshot(group: DetailGroupId, food: &FoodItem, quantity: u32) -> Self {
        Self {
            detail_group_id: group,
            food_id: food.id,
            name: food.name.clone(),
            description: food.description.clone(),
            price: food.price,
            quantity,
            image_ref: food.image_ref.clone(),
        }
    }

    /// Line total: snapshot price times purchased quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        pricing::line_total(self.price, self.quantity)
    }
}

/// Listing buckets for order history screens.
///
/// Open orders await merchant action; settled orders have either been
/// cancelled or finished (rated or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBucket {
    /// Status `Unhandled`.
    Open,
    /// Statuses `Cancelled`, `Finished`, and `FinishedCommented`.
    Settled,
}

impl OrderBucket {
    /// The status codes this bucket matches.
    #[must_use]
    pub const fn status_codes(self) -> &'static [i64] {
        match self {
            Self::Open => &[1],
            Self::Settled => &[2, 3, 4],
        }
    }
}
