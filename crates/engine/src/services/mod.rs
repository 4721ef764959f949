//! Collaborator-facing services.
//!
//! UI layers call these and render the results; everything else in the
//! crate is plumbing behind them. Each service owns a cloned handle to the
//! injected pool.

pub mod addresses;
pub mod catalog;
pub mod orders;

pub use addresses::AddressService;
pub use catalog::CatalogService;
pub use orders::OrderService;
