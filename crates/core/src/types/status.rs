//! Order status machine: the enumerated order states and their legal
//! transitions.
//!
//! The machine is small and strictly forward-moving:
//!
//! ```text
//! Unhandled(1) ──cancel──▶ Cancelled(2)          [terminal]
//! Unhandled(1) ──complete─▶ Finished(3)
//! Finished(3) ──comment──▶ FinishedCommented(4)  [terminal]
//! ```
//!
//! This module is pure: it decides which transitions are legal, while the
//! engine's order repository enforces them with conditional updates so two
//! concurrent actors cannot both win.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing or transitioning order statuses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// The stored status code is not one of the four known values.
    #[error("unknown order status code: {0}")]
    UnknownCode(i64),

    /// The stored status text is not one of the four known names.
    #[error("unknown order status: {0}")]
    UnknownName(String),
}

/// Lifecycle status of a persisted order.
///
/// Persisted as its numeric code (1-4). Status only ever advances forward;
/// `Cancelled` and `FinishedCommented` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted by the buyer, not yet handled by the merchant.
    Unhandled,
    /// Cancelled by the merchant. Terminal.
    Cancelled,
    /// Fulfilled by the merchant, awaiting the buyer's rating.
    Finished,
    /// Fulfilled and rated by the buyer. Terminal.
    FinishedCommented,
}

impl OrderStatus {
    /// Numeric code used in the persisted `status` column.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Unhandled => 1,
            Self::Cancelled => 2,
            Self::Finished => 3,
            Self::FinishedCommented => 4,
        }
    }

    /// Parse a persisted status code.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::UnknownCode` for anything outside 1-4.
    pub const fn from_code(code: i64) -> Result<Self, StatusError> {
        match code {
            1 => Ok(Self::Unhandled),
            2 => Ok(Self::Cancelled),
            3 => Ok(Self::Finished),
            4 => Ok(Self::FinishedCommented),
            other => Err(StatusError::UnknownCode(other)),
        }
    }

    /// Whether no further transition can ever succeed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::FinishedCommented)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unhandled, Self::Cancelled | Self::Finished)
                | (Self::Finished, Self::FinishedCommented)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unhandled => write!(f, "unhandled"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Finished => write!(f, "finished"),
            Self::FinishedCommented => write!(f, "finished_commented"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unhandled" => Ok(Self::Unhandled),
            "cancelled" => Ok(Self::Cancelled),
            "finished" => Ok(Self::Finished),
            "finished_commented" => Ok(Self::FinishedCommented),
            other => Err(StatusError::UnknownName(other.to_owned())),
        }
    }
}

/// An action a collaborator may attempt against a persisted order.
///
/// Each action is only legal from exactly one current status; the pair
/// (`required_status`, `target_status`) drives the engine's optimistic
/// conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Merchant cancels an unhandled order.
    Cancel,
    /// Merchant completes an unhandled order.
    Complete,
    /// Buyer rates a finished order (after the comment row persisted).
    Comment,
}

impl OrderAction {
    /// The status an order must currently hold for this action to apply.
    #[must_use]
    pub const fn required_status(self) -> OrderStatus {
        match self {
            Self::Cancel | Self::Complete => OrderStatus::Unhandled,
            Self::Comment => OrderStatus::Finished,
        }
    }

    /// The status this action moves the order to.
    #[must_use]
    pub const fn target_status(self) -> OrderStatus {
        match self {
            Self::Cancel => OrderStatus::Cancelled,
            Self::Complete => OrderStatus::Finished,
            Self::Comment => OrderStatus::FinishedCommented,
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancel => write!(f, "cancel"),
            Self::Complete => write!(f, "complete"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for status in [
            OrderStatus::Unhandled,
            OrderStatus::Cancelled,
            OrderStatus::Finished,
            OrderStatus::FinishedCommented,
        ] {
            assert_eq!(OrderStatus::from_code(status.code()), Ok(status));
        }
        assert_eq!(OrderStatus::from_code(0), Err(StatusError::UnknownCode(0)));
        assert_eq!(OrderStatus::from_code(5), Err(StatusError::UnknownCode(5)));
    }

    #[test]
    fn only_three_transitions_are_legal() {
        let all = [
            OrderStatus::Unhandled,
            OrderStatus::Cancelled,
            OrderStatus::Finished,
            OrderStatus::FinishedCommented,
        ];
        let legal: Vec<_> = all
            .iter()
            .flat_map(|from| all.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_become(*to))
            .collect();
        assert_eq!(
            legal,
            vec![
                (OrderStatus::Unhandled, OrderStatus::Cancelled),
                (OrderStatus::Unhandled, OrderStatus::Finished),
                (OrderStatus::Finished, OrderStatus::FinishedCommented),
            ]
        );
    }

    #[test]
    fn terminal_statuses_admit_nothing() {
        for terminal in [OrderStatus::Cancelled, OrderStatus::FinishedCommented] {
            assert!(terminal.is_terminal());
            for next in [
                OrderStatus::Unhandled,
                OrderStatus::Cancelled,
                OrderStatus::Finished,
                OrderStatus::FinishedCommented,
            ] {
                assert!(!terminal.can_become(next));
            }
        }
    }

    #[test]
    fn actions_agree_with_transition_predicate() {
        for action in [OrderAction::Cancel, OrderAction::Complete, OrderAction::Comment] {
            assert!(action.required_status().can_become(action.target_status()));
        }
    }
}
