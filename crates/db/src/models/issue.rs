//! Issue entity model, projections and DTOs.

use civic_core::access::IssueSubject;
use civic_core::issue_status::IssueStatus;
use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `issues` table.
///
/// `status` is decoded through [`IssueStatus`], so a row can never surface
/// with a value outside the lifecycle set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Issue {
    pub id: DbId,
    pub citizen_id: DbId,
    pub category_id: DbId,
    pub title: Option<String>,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: IssueStatus,
    /// Incremented on every status write.
    pub version: i64,
    pub created_by: DbId,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Issue {
    /// The fields the authorization rules look at.
    pub fn subject(&self) -> IssueSubject {
        IssueSubject {
            id: self.id,
            citizen_id: self.citizen_id,
            category_id: self.category_id,
            status: self.status,
        }
    }
}

/// An issue joined with its category, used by listings and detail views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueSummary {
    pub id: DbId,
    pub citizen_id: DbId,
    pub category_id: DbId,
    pub category: String,
    pub priority: String,
    pub title: Option<String>,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: IssueStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IssueSummary {
    pub fn subject(&self) -> IssueSubject {
        IssueSubject {
            id: self.id,
            citizen_id: self.citizen_id,
            category_id: self.category_id,
            status: self.status,
        }
    }
}

/// DTO for inserting an issue. New issues always start as `created`.
#[derive(Debug)]
pub struct CreateIssue {
    pub citizen_id: DbId,
    pub category_id: DbId,
    pub title: Option<String>,
    pub description: String,
    pub created_by: DbId,
}

/// An issue that has waited past its category's escalation threshold.
#[derive(Debug, Clone, FromRow)]
pub struct OverdueIssue {
    pub id: DbId,
    pub created_by: DbId,
}
