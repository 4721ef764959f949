//! Food item domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plateful_core::{BusinessId, FoodId};

/// A catalog entry owned by one business.
///
/// The price is exact fixed-point decimal, persisted as text. Food items
/// are only ever flagged, never physically deleted, so order snapshots and
/// checkout-time existence lookups keep resolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    /// Unique food ID.
    pub id: FoodId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price. Exact decimal, never binary float.
    pub price: Decimal,
    /// Opaque reference to a stored image, if any.
    pub image_ref: Option<String>,
    /// Whether this item has been withdrawn from the catalog.
    pub soft_deleted: bool,
    /// When the item was added.
    pub created_at: DateTime<Utc>,
}

impl FoodItem {
    /// Build a fresh, visible food item with a generated ID.
    #[must_use]
    pub fn new(
        business_id: BusinessId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            id: FoodId::generate(),
            business_id,
            name: name.into(),
            description: description.into(),
            price,
            image_ref,
            soft_deleted: false,
            created_at: Utc::now(),
        }
    }
}
