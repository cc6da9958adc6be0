//! Issue workflow engine.
//!
//! [`IssueWorkflow`] is the single entry point for everything that reads or
//! changes an issue on behalf of a caller. Each operation resolves the
//! issue, runs the access rules from [`civic_core::access`], validates the
//! requested transition, and only then writes, inside one transaction with a
//! compare-and-swap on the status column.
//!
//! - [`actor`] -- turn an authenticated user id into an [`Actor`](civic_core::roles::Actor).
//! - [`issues`] -- filing, listing and reading issues, comments and files.
//! - [`transitions`] -- official actions and both escalation paths.
//! - [`dashboard`] -- status counts.

pub mod actor;
pub mod dashboard;
pub mod error;
pub mod issues;
pub mod transitions;

use civic_core::access::AccessPolicy;
use civic_db::DbPool;

pub use error::{WorkflowError, WorkflowResult};
pub use issues::{CommentView, IssueDetail, NewAttachment, NewIssue};
pub use transitions::{CommentOutcome, CommentRequest, EscalationOutcome, SweepReport};

/// Default per-file upload limit (10 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Tunables for the workflow engine.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowConfig {
    pub policy: AccessPolicy,
    pub max_attachment_bytes: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            policy: AccessPolicy::default(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

/// The workflow engine. Cheap to clone; holds the pool and configuration.
#[derive(Debug, Clone)]
pub struct IssueWorkflow {
    pool: DbPool,
    config: WorkflowConfig,
}

impl IssueWorkflow {
    pub fn new(pool: DbPool, config: WorkflowConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }
}
