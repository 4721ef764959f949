//! Unified error handling for the engine.
//!
//! Every failure a collaborator can see maps to one of four kinds:
//! validation, not-found, conflict, or persistence. Each renders a
//! distinct, specific message - transactional paths never swallow an
//! error silently.

use thiserror::Error;

use plateful_core::{AddressError, OrderAction, OrderStatus, ScoreError};

use crate::db::RepositoryError;

/// Engine-level error type surfaced by the service layer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Checkout was requested with no line above quantity zero.
    #[error("cart is empty: select at least one item before checkout")]
    EmptyCart,

    /// Shipping address fields were missing or blank.
    #[error(transparent)]
    MissingAddress(#[from] AddressError),

    /// Comment score was outside the 1-5 range.
    #[error(transparent)]
    InvalidScore(#[from] ScoreError),

    /// The comment transition was requested without a comment.
    #[error("cannot mark order {0} as commented without a comment: submit a rating instead")]
    CommentRequired(String),

    /// A referenced entity no longer exists.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Human-readable entity kind ("order", "food item", "address").
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A status transition raced with another actor and lost.
    #[error(
        "cannot {action} order {order_id}: expected status {expected}, but it is {actual}"
    )]
    Conflict {
        /// The order the transition targeted.
        order_id: String,
        /// The attempted action.
        action: OrderAction,
        /// The status the action requires.
        expected: OrderStatus,
        /// The status actually found.
        actual: OrderStatus,
    },

    /// The underlying store failed; any partial writes were rolled back.
    #[error("persistence failure: {0}")]
    Persistence(RepositoryError),
}

impl EngineError {
    /// Map a repository error into the engine error space, attaching the
    /// entity kind and id for not-found lookups.
    pub(crate) fn from_repository(err: RepositoryError, entity: &'static str, id: String) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound { entity, id },
            other => Self::Persistence(other),
        }
    }
}
