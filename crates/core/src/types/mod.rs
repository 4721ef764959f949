//! Core types for Plateful.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod score;
pub mod status;

pub use address::{AddressError, ShippingAddress};
pub use id::*;
pub use score::{Score, ScoreError};
pub use status::{OrderAction, OrderStatus, StatusError};
