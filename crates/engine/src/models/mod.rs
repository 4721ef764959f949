//! Domain types for the engine.
//!
//! These are validated in-memory representations; their persisted row
//! shapes live next to the queries in [`crate::db`].

pub mod address;
pub mod business;
pub mod comment;
pub mod food;
pub mod order;

pub use address::SavedAddress;
pub use business::Business;
pub use comment::Comment;
pub use food::FoodItem;
pub use order::{Order, OrderBucket, OrderDetail};
