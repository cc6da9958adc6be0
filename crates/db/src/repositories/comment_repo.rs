//! Repository for the `issue_comments` table (append-only).

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentWithAuthor};
use crate::DbTx;

const COLUMNS: &str = "id, issue_id, user_id, body, created_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment inside an open transaction.
    pub async fn create(
        tx: &mut DbTx<'_>,
        issue_id: DbId,
        user_id: DbId,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO issue_comments (issue_id, user_id, body) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(issue_id)
            .bind(user_id)
            .bind(body)
            .fetch_one(&mut **tx)
            .await
    }

    /// Comments on an issue in creation order, with author details.
    pub async fn list_for_issue(
        pool: &PgPool,
        issue_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT ic.id, ic.issue_id, ic.user_id, u.name AS author_name, \
                    u.role AS author_role, ic.body, ic.created_at \
             FROM issue_comments ic \
             JOIN users u ON u.id = ic.user_id \
             WHERE ic.issue_id = $1 \
             ORDER BY ic.created_at ASC, ic.id ASC",
        )
        .bind(issue_id)
        .fetch_all(pool)
        .await
    }
}
