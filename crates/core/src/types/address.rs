//! Shipping address value type.
//!
//! An order stores its address by value, not by reference: the recipient
//! name, phone, and street detail are validated at checkout and joined into
//! a single text column. Later edits or deletion of a buyer's saved address
//! never affect past orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiter joining the three address fields in the persisted column.
const FIELD_DELIMITER: char = '|';

/// Errors produced when validating a shipping address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// One or more of the required fields is empty or whitespace.
    #[error("missing address: {0} must not be empty")]
    EmptyField(&'static str),
}

/// A validated shipping address, captured by value at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    recipient: String,
    phone: String,
    detail: String,
}

impl ShippingAddress {
    /// Validate and build a shipping address.
    ///
    /// All three fields must be non-empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::EmptyField` naming the first empty field.
    pub fn new(
        recipient: impl Into<String>,
        phone: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<Self, AddressError> {
        let recipient = recipient.into().trim().to_owned();
        let phone = phone.into().trim().to_owned();
        let detail = detail.into().trim().to_owned();

        if recipient.is_empty() {
            return Err(AddressError::EmptyField("recipient"));
        }
        if phone.is_empty() {
            return Err(AddressError::EmptyField("phone"));
        }
        if detail.is_empty() {
            return Err(AddressError::EmptyField("detail"));
        }

        Ok(Self {
            recipient,
            phone,
            detail,
        })
    }

    /// Recipient name.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Contact phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Street-level detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Render the delimiter-joined form stored in the `orders.address`
    /// column.
    #[must_use]
    pub fn to_column(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.recipient, self.phone, self.detail
        )
    }

    /// Parse the persisted column form back into its fields.
    ///
    /// Historical rows are free text, so anything without all three
    /// segments is kept whole as the detail field. No stored text is
    /// ever dropped.
    #[must_use]
    pub fn from_column(raw: &str) -> Self {
        let mut parts = raw.splitn(3, FIELD_DELIMITER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(recipient), Some(phone), Some(detail)) => Self {
                recipient: recipient.to_owned(),
                phone: phone.to_owned(),
                detail: detail.to_owned(),
            },
            _ => Self {
                recipient: String::new(),
                phone: String::new(),
                detail: raw.to_owned(),
            },
        }
    }
}

impl std::fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) {}", self.recipient, self.phone, self.detail)
    }
}
