//! Dashboard projections.

use civic_core::issue_status::IssueStatus;
use serde::Serialize;

/// Issue counts per status for one caller's scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: i64,
    pub created: i64,
    pub in_progress: i64,
    pub escalated: i64,
    pub rejected: i64,
    pub completed: i64,
}

impl StatusCounts {
    /// Fold `(status, count)` rows into the fixed shape. `total` is their sum.
    pub fn from_rows(rows: impl IntoIterator<Item = (IssueStatus, i64)>) -> Self {
        let mut counts = Self::default();
        for (status, n) in rows {
            match status {
                IssueStatus::Created => counts.created += n,
                IssueStatus::InProgress => counts.in_progress += n,
                IssueStatus::Escalated => counts.escalated += n,
                IssueStatus::Rejected => counts.rejected += n,
                IssueStatus::Completed => counts.completed += n,
            }
            counts.total += n;
        }
        counts
    }
}
