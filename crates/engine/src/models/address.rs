//! Saved shipping address domain type.

use serde::{Deserialize, Serialize};

use plateful_core::{AddressId, ShippingAddress, UserId};

/// A buyer's saved shipping address.
///
/// Saved addresses are convenience records with their own CRUD lifecycle.
/// At checkout the chosen address is copied by value into the order, so
/// editing or deleting a saved address never affects past orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAddress {
    /// Unique address ID.
    pub id: AddressId,
    /// The owning buyer.
    pub user_id: UserId,
    /// The validated address value.
    pub address: ShippingAddress,
}

impl SavedAddress {
    /// Build a fresh saved address with a generated ID.
    #[must_use]
    pub fn new(user_id: UserId, address: ShippingAddress) -> Self {
        Self {
            id: AddressId::generate(),
            user_id,
            address,
        }
    }
}
