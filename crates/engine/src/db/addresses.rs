//! Saved-address repository.
//!
//! Saved addresses have their own CRUD lifecycle, independent of orders.
//! Checkout copies the chosen address by value into the order row, so
//! nothing here can ever change a past order.

use sqlx::SqlitePool;

use plateful_core::{AddressId, ShippingAddress, UserId};

use super::RepositoryError;
use crate::models::SavedAddress;

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    user_id: UserId,
    recipient: String,
    detail: String,
    phone: String,
}

impl TryFrom<AddressRow> for SavedAddress {
    type Error = RepositoryError;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        let address = ShippingAddress::new(row.recipient, row.phone, row.detail)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            address,
        })
    }
}

const SELECT_ADDRESS: &str =
    "SELECT id, user_id, recipient, detail, phone FROM address";

/// Repository for buyers' saved shipping addresses.
pub struct AddressRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a saved address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, saved: &SavedAddress) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO address (id, user_id, recipient, detail, phone) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(saved.id)
        .bind(saved.user_id)
        .bind(saved.address.recipient())
        .bind(saved.address.detail())
        .bind(saved.address.phone())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a saved address by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored fields are
    /// invalid.
    pub async fn get(&self, id: AddressId) -> Result<Option<SavedAddress>, RepositoryError> {
        let sql = format!("{SELECT_ADDRESS} WHERE id = ?");
        let row = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List a buyer's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored fields are
    /// invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<SavedAddress>, RepositoryError> {
        let sql = format!("{SELECT_ADDRESS} WHERE user_id = ? ORDER BY rowid ASC");
        let rows = sqlx::query_as::<_, AddressRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Replace a saved address's fields. Ownership is verified: updating
    /// another user's address reports not-found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to a different user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: AddressId,
        user_id: UserId,
        address: &ShippingAddress,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE address SET recipient = ?, detail = ?, phone = ? WHERE id = ? AND user_id = ?",
        )
        .bind(address.recipient())
        .bind(address.detail())
        .bind(address.phone())
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a saved address. Past orders are unaffected: they hold the
    /// address by value. Ownership is verified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist or
    /// belongs to a different user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: AddressId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM address WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
