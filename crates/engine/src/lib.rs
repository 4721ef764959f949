//! Plateful Engine - the order and cart lifecycle engine.
//!
//! This crate turns a mutable shopping selection into an immutable, priced
//! order record, advances that order through a small status machine, and
//! enforces visibility rules when the owning catalog entries are withdrawn.
//!
//! # Architecture
//!
//! - [`cart`] - Per-(buyer, business) in-memory selection state
//! - [`models`] - Domain types for businesses, food, orders, comments,
//!   and saved addresses
//! - [`db`] - Repositories over an injected `sqlx` `SQLite` pool
//! - [`services`] - The collaborator-facing operations: catalog reads,
//!   checkout, status transitions, comment submission
//!
//! The engine is a library boundary, not a wire API: UI layers call into
//! [`services`] and render the results. All repository access goes through
//! an explicitly injected pool - there is no global database handle.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use cart::{Cart, CartItemView, CartLine};
pub use error::EngineError;
pub use services::{AddressService, CatalogService, OrderService};
