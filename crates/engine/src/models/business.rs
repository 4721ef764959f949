//! Business (merchant) domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plateful_core::BusinessId;

/// A merchant operating a catalog of food items.
///
/// Businesses are never physically deleted. Soft-deleting one hides every
/// food item it owns from the purchasable catalog while leaving historical
/// order data untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    /// Unique business ID.
    pub id: BusinessId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Cuisine or storefront category.
    pub category: String,
    /// Opaque reference to a stored image, if any.
    pub image_ref: Option<String>,
    /// Whether this business has been withdrawn from the catalog.
    pub soft_deleted: bool,
    /// When the business was registered.
    pub created_at: DateTime<Utc>,
}

impl Business {
    /// Build a fresh, visible business with a generated ID.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            id: BusinessId::generate(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            image_ref,
            soft_deleted: false,
            created_at: Utc::now(),
        }
    }
}
