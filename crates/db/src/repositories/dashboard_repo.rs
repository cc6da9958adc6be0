//! Aggregate queries for the dashboard.

use civic_core::access::ListScope;
use civic_core::issue_status::IssueStatus;
use sqlx::PgPool;

use crate::models::dashboard::StatusCounts;
use crate::repositories::issue_repo::{scope_conditions, where_clause};

pub struct DashboardRepo;

impl DashboardRepo {
    /// Per-status issue counts for the rows visible under `scope`.
    pub async fn status_counts(
        pool: &PgPool,
        scope: &ListScope,
    ) -> Result<StatusCounts, sqlx::Error> {
        let mut param_idx: usize = 1;
        let conditions = scope_conditions(scope, None, &mut param_idx);
        let query = format!(
            "SELECT i.status, COUNT(*) FROM issues i {} GROUP BY i.status",
            where_clause(&conditions)
        );

        let mut q = sqlx::query_as::<_, (String, i64)>(&query);
        if let Some(citizen_id) = scope.citizen_id {
            q = q.bind(citizen_id);
        }
        if let Some(ids) = &scope.category_ids {
            q = q.bind(ids.clone());
        }
        let rows = q.fetch_all(pool).await?;

        // The CHECK constraint keeps unknown values out; skip rather than fail.
        Ok(StatusCounts::from_rows(rows.into_iter().filter_map(
            |(status, n)| IssueStatus::parse(&status).ok().map(|s| (s, n)),
        )))
    }
}
