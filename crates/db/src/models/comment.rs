//! Issue comment model.

use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `issue_comments` table. Comments are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub issue_id: DbId,
    pub user_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

/// A comment joined with its author's name and role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub issue_id: DbId,
    pub user_id: DbId,
    pub author_name: String,
    pub author_role: String,
    pub body: String,
    pub created_at: Timestamp,
}
