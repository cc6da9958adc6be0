//! Repository for the `attachments` table.
//!
//! Metadata queries never select `data`; only [`AttachmentRepo::find_blob`]
//! reads the bytes.

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::{Attachment, AttachmentBlob, CreateAttachment};
use crate::DbTx;

const COLUMNS: &str = "id, issue_id, comment_id, filename, mimetype, size_bytes, created_at";

pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Store a file inside an open transaction, returning its metadata.
    ///
    /// A `comment_id` belonging to another issue violates
    /// `fk_attachments_comment_same_issue`.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &CreateAttachment<'_>,
    ) -> Result<Attachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO attachments (issue_id, comment_id, filename, mimetype, size_bytes, data) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(input.issue_id)
            .bind(input.comment_id)
            .bind(input.filename)
            .bind(input.mimetype)
            .bind(input.data.len() as i64)
            .bind(input.data)
            .fetch_one(&mut **tx)
            .await
    }

    /// Files filed with the issue itself (not with a comment).
    pub async fn list_for_issue(
        pool: &PgPool,
        issue_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attachments \
             WHERE issue_id = $1 AND comment_id IS NULL \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(issue_id)
            .fetch_all(pool)
            .await
    }

    /// Files attached to any of the given comments.
    pub async fn list_for_comments(
        pool: &PgPool,
        comment_ids: &[DbId],
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM attachments \
             WHERE comment_id = ANY($1) \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(comment_ids)
            .fetch_all(pool)
            .await
    }

    /// Load a stored file including its bytes.
    pub async fn find_blob(pool: &PgPool, id: DbId) -> Result<Option<AttachmentBlob>, sqlx::Error> {
        sqlx::query_as::<_, AttachmentBlob>(
            "SELECT id, issue_id, filename, mimetype, data FROM attachments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
