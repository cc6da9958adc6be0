//! Status changes: official comment + status actions and escalation.
//!
//! Every path follows the same order: validate input, load the issue, run the
//! access rules, validate the transition, then write inside one transaction.
//! The status write is a compare-and-swap on the status read at the start,
//! so two racing requests cannot both apply a transition from the same
//! state. Any failure inside the transaction rolls the whole unit back.

use civic_core::access;
use civic_core::error::CoreError;
use civic_core::escalation::{self, ManualEscalation};
use civic_core::issue_status::{self, IssueStatus, TransitionKind};
use civic_core::roles::Actor;
use civic_core::types::{DbId, Timestamp};
use civic_core::validation;
use civic_db::models::attachment::Attachment;
use civic_db::models::category::IssueCategory;
use civic_db::models::comment::Comment;
use civic_db::models::issue::Issue;
use civic_db::repositories::{CategoryRepo, CommentRepo, IssueRepo};
use civic_db::DbTx;
use serde::Serialize;

use crate::issues::{store_uploads, validate_uploads, NewAttachment};
use crate::{IssueWorkflow, WorkflowError, WorkflowResult};

const ENTITY_ISSUE: &str = "Issue";

/// How many overdue issues one sweep pass handles at most.
const SWEEP_BATCH_SIZE: i64 = 100;

/// An official's comment + status action.
#[derive(Debug, Clone)]
pub struct CommentRequest {
    /// Optional comment text. Blank means no comment.
    pub comment: Option<String>,
    /// Target status. Must be one of `in_progress`, `rejected`, `completed`.
    pub status: IssueStatus,
    /// The status the caller last saw. When set and the issue has moved on,
    /// the request fails with `ConcurrentModification` instead of applying.
    pub expected_status: Option<IssueStatus>,
    pub attachments: Vec<NewAttachment>,
}

/// Result of a comment + status action.
#[derive(Debug, Clone, Serialize)]
pub struct CommentOutcome {
    pub issue: Issue,
    pub comment: Option<Comment>,
    pub attachments: Vec<Attachment>,
}

/// Result of an escalation.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationOutcome {
    pub issue: Issue,
    pub comment: Comment,
    /// Only reported for category escalations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_resolution_hours: Option<i32>,
}

/// Tally of one automatic escalation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub escalated: usize,
    pub skipped: usize,
}

fn concurrent(issue_id: DbId) -> CoreError {
    CoreError::ConcurrentModification {
        entity: ENTITY_ISSUE,
        id: issue_id,
    }
}

impl IssueWorkflow {
    /// Add a comment and move the issue to a new status as one unit.
    ///
    /// Order of checks: target status, comment and files, existence,
    /// authorization, optional expected status, transition. Nothing is
    /// written unless all of them pass.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        issue_id: DbId,
        request: CommentRequest,
    ) -> WorkflowResult<CommentOutcome> {
        issue_status::validate_official_target(request.status)?;
        let body = validation::validate_comment(request.comment.as_deref())?;
        validate_uploads(&request.attachments, self.config.max_attachment_bytes)?;

        let issue = self.load_issue(issue_id).await?;
        access::authorize_official_action(actor, &issue.subject(), self.config.policy)?;

        if let Some(expected) = request.expected_status {
            if expected != issue.status {
                return Err(concurrent(issue_id).into());
            }
        }
        issue_status::validate_transition(issue.status, request.status, TransitionKind::OfficialAction)?;

        let mut tx = self.pool.begin().await?;
        let comment = match &body {
            Some(text) => Some(CommentRepo::create(&mut tx, issue_id, actor.user_id(), text).await?),
            None => None,
        };
        let updated = cas_status(&mut tx, &issue, request.status, actor.user_id()).await?;
        let attachments = store_uploads(
            &mut tx,
            issue_id,
            comment.as_ref().map(|c| c.id),
            &request.attachments,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            issue_id,
            user_id = actor.user_id(),
            from = %issue.status,
            to = %updated.status,
            comment_id = comment.as_ref().map(|c| c.id),
            attachments = attachments.len(),
            "Issue status changed"
        );

        Ok(CommentOutcome {
            issue: updated,
            comment,
            attachments,
        })
    }

    /// Manual escalation by the citizen who filed the issue.
    pub async fn escalate_manual(
        &self,
        actor: &Actor,
        issue_id: DbId,
        reason: &str,
        note: &str,
    ) -> WorkflowResult<EscalationOutcome> {
        let request: ManualEscalation = escalation::validate_manual_request(reason, note)?;

        let issue = self.load_issue(issue_id).await?;
        access::authorize_escalation(actor, &issue.subject())?;
        if let Err(e) = issue_status::validate_transition(
            issue.status,
            IssueStatus::Escalated,
            TransitionKind::ManualEscalation,
        ) {
            tracing::warn!(issue_id, status = %issue.status, "Manual escalation rejected");
            return Err(e.into());
        }

        let body = escalation::format_manual_comment(&request);
        let (issue, comment) = self.apply_escalation(&issue, actor.user_id(), &body).await?;

        tracing::info!(issue_id, user_id = actor.user_id(), "Issue escalated manually");
        Ok(EscalationOutcome {
            issue,
            comment,
            expected_resolution_hours: None,
        })
    }

    /// Escalation once the category's waiting period has elapsed at `now`.
    ///
    /// Requested by the filing citizen; `reason` and `note` are optional.
    pub async fn escalate_by_category(
        &self,
        actor: &Actor,
        issue_id: DbId,
        reason: Option<&str>,
        note: Option<&str>,
        now: Timestamp,
    ) -> WorkflowResult<EscalationOutcome> {
        escalation::validate_timeout_request(reason, note)?;

        let issue = self.load_issue(issue_id).await?;
        access::authorize_escalation(actor, &issue.subject())?;
        let category = self.check_timeout(&issue, now).await?;

        let body = escalation::format_category_comment(&category.priority, reason, note);
        let (issue, comment) = self.apply_escalation(&issue, actor.user_id(), &body).await?;

        tracing::info!(
            issue_id,
            user_id = actor.user_id(),
            category_id = category.id,
            "Issue escalated by category timeout"
        );
        Ok(EscalationOutcome {
            issue,
            comment,
            expected_resolution_hours: category.expected_resolution_hours,
        })
    }

    /// Escalate one overdue issue without a caller.
    ///
    /// Runs the same transition and timing checks as
    /// [`escalate_by_category`](Self::escalate_by_category). The audit comment
    /// is attributed to the user who filed the issue.
    pub async fn auto_escalate(
        &self,
        issue_id: DbId,
        now: Timestamp,
    ) -> WorkflowResult<EscalationOutcome> {
        let issue = self.load_issue(issue_id).await?;
        let category = self.check_timeout(&issue, now).await?;

        let body = escalation::format_category_comment(
            &category.priority,
            Some(escalation::AUTOMATIC_REASON),
            None,
        );
        let (issue, comment) = self.apply_escalation(&issue, issue.created_by, &body).await?;

        tracing::info!(issue_id, category_id = category.id, "Issue escalated automatically");
        Ok(EscalationOutcome {
            issue,
            comment,
            expected_resolution_hours: category.expected_resolution_hours,
        })
    }

    /// Escalate every `created` issue that is past its category threshold.
    ///
    /// Per-issue domain failures (for example an official acting on the issue
    /// between the scan and the write) are counted as skipped; storage
    /// failures abort the pass.
    pub async fn run_escalation_sweep(&self, now: Timestamp) -> WorkflowResult<SweepReport> {
        let overdue = IssueRepo::find_overdue_created(&self.pool, now, SWEEP_BATCH_SIZE).await?;
        let mut report = SweepReport::default();

        for candidate in overdue {
            match self.auto_escalate(candidate.id, now).await {
                Ok(_) => report.escalated += 1,
                Err(WorkflowError::Core(e)) => {
                    tracing::debug!(issue_id = candidate.id, error = %e, "Skipped automatic escalation");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    async fn load_issue(&self, issue_id: DbId) -> WorkflowResult<Issue> {
        Ok(IssueRepo::find_by_id(&self.pool, issue_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_ISSUE,
                id: issue_id,
            })?)
    }

    /// Transition and timing checks shared by both timeout paths.
    async fn check_timeout(&self, issue: &Issue, now: Timestamp) -> WorkflowResult<IssueCategory> {
        if let Err(e) = issue_status::validate_transition(
            issue.status,
            IssueStatus::Escalated,
            TransitionKind::TimeoutEscalation,
        ) {
            tracing::warn!(issue_id = issue.id, status = %issue.status, "Category escalation rejected");
            return Err(e.into());
        }

        let category = CategoryRepo::find_by_id(&self.pool, issue.category_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!("Issue {} has no category row", issue.id))
            })?;

        if let Err(e) =
            escalation::check_timeout_eligibility(issue.created_at, now, category.escalate_after_hours)
        {
            tracing::warn!(issue_id = issue.id, error = %e, "Category escalation requested too early");
            return Err(e.into());
        }

        Ok(category)
    }

    /// Write the audit comment and move the issue to `escalated`.
    async fn apply_escalation(
        &self,
        issue: &Issue,
        author_id: DbId,
        body: &str,
    ) -> WorkflowResult<(Issue, Comment)> {
        let mut tx = self.pool.begin().await?;
        let comment = CommentRepo::create(&mut tx, issue.id, author_id, body).await?;
        let updated = cas_status(&mut tx, issue, IssueStatus::Escalated, author_id).await?;
        tx.commit().await?;
        Ok((updated, comment))
    }
}

/// Compare-and-swap the status from the value read at the start of the
/// operation. A miss means another writer got there first.
async fn cas_status(
    tx: &mut DbTx<'_>,
    issue: &Issue,
    to: IssueStatus,
    updated_by: DbId,
) -> WorkflowResult<Issue> {
    match IssueRepo::update_status(tx, issue.id, to, issue.status, issue.version, updated_by)
        .await?
    {
        Some(updated) => Ok(updated),
        None => {
            tracing::warn!(
                issue_id = issue.id,
                expected = %issue.status,
                version = issue.version,
                "Issue changed concurrently"
            );
            Err(concurrent(issue.id).into())
        }
    }
}
