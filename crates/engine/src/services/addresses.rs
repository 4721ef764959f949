//! Address service: CRUD for buyers' saved shipping addresses.
//!
//! Orders reference addresses by value, never by foreign key, so nothing
//! here can retroactively change an order.

use sqlx::SqlitePool;
use tracing::{info, instrument};

use plateful_core::{AddressId, ShippingAddress, UserId};

use crate::db::AddressRepository;
use crate::error::EngineError;
use crate::models::SavedAddress;

/// Saved-address management for buyers.
#[derive(Debug, Clone)]
pub struct AddressService {
    pool: SqlitePool,
}

impl AddressService {
    /// Create a new address service over an injected pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new address for a buyer.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingAddress` if any field is blank.
    /// Returns `EngineError::Persistence` if the insert fails.
    #[instrument(skip(self, recipient, phone, detail))]
    pub async fn save(
        &self,
        user_id: UserId,
        recipient: &str,
        phone: &str,
        detail: &str,
    ) -> Result<SavedAddress, EngineError> {
        let address = ShippingAddress::new(recipient, phone, detail)?;
        let saved = SavedAddress::new(user_id, address);

        AddressRepository::new(&self.pool)
            .insert(&saved)
            .await
            .map_err(EngineError::Persistence)?;

        info!(address_id = %saved.id, %user_id, "saved address");
        Ok(saved)
    }

    /// Get one saved address.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if it doesn't exist.
    /// Returns `EngineError::Persistence` for store failures.
    pub async fn get(&self, address_id: AddressId) -> Result<SavedAddress, EngineError> {
        AddressRepository::new(&self.pool)
            .get(address_id)
            .await
            .map_err(EngineError::Persistence)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "address",
                id: address_id.to_string(),
            })
    }

    /// List a buyer's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<SavedAddress>, EngineError> {
        AddressRepository::new(&self.pool)
            .list_for_user(user_id)
            .await
            .map_err(EngineError::Persistence)
    }

    /// Update a saved address. Past orders keep their captured values.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingAddress` if any field is blank.
    /// Returns `EngineError::NotFound` if the address doesn't exist or
    /// belongs to a different user.
    /// Returns `EngineError::Persistence` for store failures.
    #[instrument(skip(self, recipient, phone, detail))]
    pub async fn update(
        &self,
        address_id: AddressId,
        user_id: UserId,
        recipient: &str,
        phone: &str,
        detail: &str,
    ) -> Result<SavedAddress, EngineError> {
        let address = ShippingAddress::new(recipient, phone, detail)?;

        AddressRepository::new(&self.pool)
            .update(address_id, user_id, &address)
            .await
            .map_err(|e| EngineError::from_repository(e, "address", address_id.to_string()))?;

        Ok(SavedAddress {
            id: address_id,
            user_id,
            address,
        })
    }

    /// Delete a saved address. Past orders keep their captured values.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the address doesn't exist or
    /// belongs to a different user.
    /// Returns `EngineError::Persistence` for store failures.
    #[instrument(skip(self))]
    pub async fn delete(&self, address_id: AddressId, user_id: UserId) -> Result<(), EngineError> {
        AddressRepository::new(&self.pool)
            .delete(address_id, user_id)
            .await
            .map_err(|e| EngineError::from_repository(e, "address", address_id.to_string()))?;

        info!(%address_id, %user_id, "deleted saved address");
        Ok(())
    }
}
