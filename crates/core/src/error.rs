use std::fmt;

use crate::issue_status::IssueStatus;
use crate::types::DbId;

/// Why a credential was rejected by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No credential, or a malformed `Authorization` header.
    Missing,
    /// Signature was fine but the token is past its expiry.
    Expired,
    /// Bad signature, wrong algorithm, unknown subject, or bad login.
    Invalid,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Missing => "Authentication token is missing",
            Self::Expired => "Authentication token has expired",
            Self::Invalid => "Invalid credentials",
        };
        f.write_str(msg)
    }
}

/// Domain error taxonomy shared by every layer.
///
/// All variants except [`CoreError::Internal`] are expected outcomes of normal
/// operation; callers match on the variant, never on the message text.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed on '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot transition from '{current}' (allowed: {allowed:?})")]
    InvalidTransition {
        current: IssueStatus,
        allowed: Vec<IssueStatus>,
    },

    #[error("Escalation not yet allowed: {hours_remaining} hours remaining")]
    EscalationTooEarly { hours_remaining: f64 },

    #[error("{entity} {id} was modified concurrently")]
    ConcurrentModification { entity: &'static str, id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
