//! Plateful Core - Shared types library.
//!
//! This crate provides common types used across all Plateful components:
//! - `engine` - The order and cart lifecycle engine
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, statuses, addresses,
//!   and comment scores
//! - [`pricing`] - Exact fixed-point line and order totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use types::*;
