//! Issue category model.

use civic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `issue_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueCategory {
    pub id: DbId,
    pub name: String,
    pub priority: String,
    pub escalate_after_hours: Option<i32>,
    pub expected_resolution_hours: Option<i32>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub priority: Option<String>,
    pub escalate_after_hours: Option<i32>,
    pub expected_resolution_hours: Option<i32>,
}
