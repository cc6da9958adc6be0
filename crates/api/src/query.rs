//! Shared query-string parameter types.

use civic_core::error::CoreError;
use civic_core::issue_status::IssueStatus;
use serde::Deserialize;

/// Query parameters for `GET /issues`.
#[derive(Debug, Default, Deserialize)]
pub struct IssueListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl IssueListParams {
    /// Parse the optional status filter. An empty value means no filter.
    pub fn status_filter(&self) -> Result<Option<IssueStatus>, CoreError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => IssueStatus::parse(raw).map(Some),
        }
    }
}
