//! Comment score newtype.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced when a score is outside the 1-5 range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("score must be between 1 and 5, got {0}")]
pub struct ScoreError(pub i64);

/// A buyer's 1-5 rating attached to a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// Validate and build a score.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError` when the value is outside 1-5.
    pub const fn new(value: i64) -> Result<Self, ScoreError> {
        match value {
            1..=5 => Ok(Self(value as u8)),
            other => Err(ScoreError(other)),
        }
    }

    /// The underlying rating value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range() {
        for value in 1..=5 {
            assert_eq!(Score::new(value).map(Score::value), Ok(value as u8));
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Score::new(0), Err(ScoreError(0)));
        assert_eq!(Score::new(6), Err(ScoreError(6)));
        assert_eq!(Score::new(-3), Err(ScoreError(-3)));
    }
}
