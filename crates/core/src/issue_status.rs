//! Issue lifecycle state machine.
//!
//! Defines the fixed set of issue statuses, which moves each kind of actor
//! may request, and the validation helper used by the workflow engine before
//! any status write.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status of an issue. Stored as a lowercase snake_case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Created,
    InProgress,
    Escalated,
    Rejected,
    Completed,
}

impl IssueStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [IssueStatus; 5] = [
        Self::Created,
        Self::InProgress,
        Self::Escalated,
        Self::Rejected,
        Self::Completed,
    ];

    /// Parse a status string from the database or a request.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "created" => Ok(Self::Created),
            "in_progress" => Ok(Self::InProgress),
            "escalated" => Ok(Self::Escalated),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::validation(
                "status",
                format!(
                    "Invalid issue status '{s}'. Must be one of: \
                     created, in_progress, escalated, rejected, completed"
                ),
            )),
        }
    }

    /// Convert to the database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::Escalated => "escalated",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// `rejected` and `completed` end the lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for IssueStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Statuses an official may set through the comment + status action.
pub const OFFICIAL_TARGETS: &[IssueStatus] = &[
    IssueStatus::InProgress,
    IssueStatus::Rejected,
    IssueStatus::Completed,
];

const ESCALATED_ONLY: &[IssueStatus] = &[IssueStatus::Escalated];

/// The kind of move being requested. Each kind has its own transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// An official or higher official sets a new status with a comment.
    OfficialAction,
    /// The filing citizen escalates with a reason and note.
    ManualEscalation,
    /// Escalation because the category's waiting period has elapsed.
    TimeoutEscalation,
}

/// Returns the statuses that `from` may move to for the given kind of move.
///
/// - official action: `created`, `in_progress`, `escalated` -> `in_progress`,
///   `rejected`, `completed`
/// - manual escalation: `created`, `in_progress` -> `escalated`
/// - timeout escalation: `created` -> `escalated`
/// - terminal statuses allow nothing
pub fn allowed_targets(from: IssueStatus, kind: TransitionKind) -> &'static [IssueStatus] {
    use IssueStatus::*;

    match (kind, from) {
        (_, Rejected | Completed) => &[],
        (TransitionKind::OfficialAction, Created | InProgress | Escalated) => OFFICIAL_TARGETS,
        (TransitionKind::ManualEscalation, Created | InProgress) => ESCALATED_ONLY,
        (TransitionKind::TimeoutEscalation, Created) => ESCALATED_ONLY,
        _ => &[],
    }
}

/// Validate that moving from `current` to `next` is allowed for `kind`.
///
/// Fails with [`CoreError::InvalidTransition`] carrying the current status and
/// the targets that would have been accepted.
pub fn validate_transition(
    current: IssueStatus,
    next: IssueStatus,
    kind: TransitionKind,
) -> Result<(), CoreError> {
    let allowed = allowed_targets(current, kind);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            current,
            allowed: allowed.to_vec(),
        })
    }
}

/// Validate that a requested status is one an official may set.
pub fn validate_official_target(status: IssueStatus) -> Result<(), CoreError> {
    if OFFICIAL_TARGETS.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::validation(
            "status",
            format!("Status must be one of: in_progress, rejected, completed (got '{status}')"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
