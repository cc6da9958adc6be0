//! Attachment model. The binary payload is only loaded by
//! [`AttachmentRepo::find_blob`](crate::repositories::AttachmentRepo::find_blob).

use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Attachment metadata (everything but the bytes).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub issue_id: DbId,
    pub comment_id: Option<DbId>,
    pub filename: String,
    pub mimetype: String,
    pub size_bytes: i64,
    pub created_at: Timestamp,
}

/// The stored file for download.
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentBlob {
    pub id: DbId,
    pub issue_id: DbId,
    pub filename: String,
    pub mimetype: String,
    pub data: Vec<u8>,
}

/// DTO for storing a file.
#[derive(Debug)]
pub struct CreateAttachment<'a> {
    pub issue_id: DbId,
    pub comment_id: Option<DbId>,
    pub filename: &'a str,
    pub mimetype: &'a str,
    pub data: &'a [u8],
}
