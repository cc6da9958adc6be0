//! Status counts for the caller's scope.

use civic_core::access;
use civic_core::roles::Actor;
use civic_db::models::dashboard::StatusCounts;
use civic_db::repositories::DashboardRepo;

use crate::{IssueWorkflow, WorkflowResult};

impl IssueWorkflow {
    /// Per-status issue counts over the issues the caller is responsible for.
    ///
    /// Officials' counts include escalated issues in their categories, even
    /// when their listing hides them, so the totals add up.
    pub async fn status_counts(&self, actor: &Actor) -> WorkflowResult<StatusCounts> {
        let scope = access::count_scope(actor);
        Ok(DashboardRepo::status_counts(&self.pool, &scope).await?)
    }
}
