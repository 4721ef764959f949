//! Comment repository: read side of business ratings.
//!
//! Comment rows are *written* by [`super::OrderRepository::finalize_comment`],
//! inside the same transaction as the order's status transition. This
//! repository covers the read paths merchants and buyers see.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use plateful_core::{BusinessId, CommentId, Score, UserId};

use super::RepositoryError;
use crate::models::Comment;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: CommentId,
    user_id: UserId,
    business_id: BusinessId,
    content: String,
    score: i64,
    image_ref: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let score = Score::new(row.score)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            business_id: row.business_id,
            content: row.content,
            score,
            image_ref: row.image_ref,
            created_at: row.created_at,
        })
    }
}

/// Repository for comment reads.
pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a business's comments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored score is
    /// invalid.
    pub async fn list_for_business(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, user_id, business_id, content, score, image_ref, created_at \
             FROM comment WHERE business_id = ? ORDER BY created_at DESC",
        )
        .bind(business_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Average score for a business, or `None` when it has no comments.
    ///
    /// Averaged in decimal over the integer scores, not floating point.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn average_score(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let totals = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(score), 0), COUNT(*) FROM comment WHERE business_id = ?",
        )
        .bind(business_id)
        .fetch_one(self.pool)
        .await?;

        let (sum, count) = totals;
        if count == 0 {
            return Ok(None);
        }

        Ok(Some(Decimal::from(sum) / Decimal::from(count)))
    }
}
