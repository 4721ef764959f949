//! Comment domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plateful_core::{BusinessId, CommentId, Score, UserId};

/// A buyer's rating of a business, created once when a finished order is
/// rated. Persisting the comment row is what drives the order's
/// `Finished` to `FinishedCommented` transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment ID.
    pub id: CommentId,
    /// The rating author.
    pub user_id: UserId,
    /// The rated business.
    pub business_id: BusinessId,
    /// Free-text content.
    pub content: String,
    /// 1-5 rating.
    pub score: Score,
    /// Opaque reference to an attached image, if any.
    pub image_ref: Option<String>,
    /// When the comment was submitted.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a fresh comment with a generated ID.
    #[must_use]
    pub fn new(
        user_id: UserId,
        business_id: BusinessId,
        content: impl Into<String>,
        score: Score,
        image_ref: Option<String>,
    ) -> Self {
        Self {
            id: CommentId::generate(),
            user_id,
            business_id,
            content: content.into(),
            score,
            image_ref,
            created_at: Utc::now(),
        }
    }
}
