//! Role-based visibility and authorization rules for issues.
//!
//! Every check here runs *after* the issue is known to exist. A citizen who
//! asks about somebody else's issue gets `NotFound`, the same answer as for
//! an id that does not exist, so ownership never leaks through the status
//! code. Officials get `Forbidden` for issues outside their categories.

use crate::error::CoreError;
use crate::issue_status::IssueStatus;
use crate::roles::Actor;
use crate::types::DbId;

const ENTITY_ISSUE: &str = "Issue";

/// Deployment switches for the authorization rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// When `false`, escalated issues are left to higher officials: regular
    /// officials cannot act on them and do not see them in listings.
    pub officials_handle_escalated: bool,
}

/// The parts of an issue the rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueSubject {
    pub id: DbId,
    pub citizen_id: DbId,
    pub category_id: DbId,
    pub status: IssueStatus,
}

/// Row filter for listings and counts, derived from the caller's role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScope {
    /// Restrict to one citizen's issues.
    pub citizen_id: Option<DbId>,
    /// Restrict to these categories. `None` means all categories.
    pub category_ids: Option<Vec<DbId>>,
    /// Hide issues currently in `escalated`.
    pub exclude_escalated: bool,
}

fn not_found(issue: &IssueSubject) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY_ISSUE,
        id: issue.id,
    }
}

fn outside_categories() -> CoreError {
    CoreError::Forbidden("Issue is outside your assigned categories".into())
}

/// May `actor` read this issue, its comments and its attachments?
pub fn authorize_view(actor: &Actor, issue: &IssueSubject) -> Result<(), CoreError> {
    match actor {
        Actor::Citizen { citizen_id, .. } => {
            if *citizen_id == issue.citizen_id {
                Ok(())
            } else {
                Err(not_found(issue))
            }
        }
        Actor::Official { categories, .. } => {
            if categories.contains(&issue.category_id) {
                Ok(())
            } else {
                Err(outside_categories())
            }
        }
        Actor::HigherOfficial { .. } => Ok(()),
    }
}

/// May `actor` comment on the issue and change its status?
pub fn authorize_official_action(
    actor: &Actor,
    issue: &IssueSubject,
    policy: AccessPolicy,
) -> Result<(), CoreError> {
    match actor {
        Actor::Citizen { citizen_id, .. } => {
            if *citizen_id != issue.citizen_id {
                return Err(not_found(issue));
            }
            Err(CoreError::Forbidden(
                "Only officials may update an issue's status".into(),
            ))
        }
        Actor::Official { categories, .. } => {
            if !categories.contains(&issue.category_id) {
                return Err(outside_categories());
            }
            if issue.status == IssueStatus::Escalated && !policy.officials_handle_escalated {
                return Err(CoreError::Forbidden(
                    "Escalated issues are handled by higher officials".into(),
                ));
            }
            Ok(())
        }
        Actor::HigherOfficial { scope, .. } => {
            if scope.covers(issue.category_id) {
                Ok(())
            } else {
                Err(outside_categories())
            }
        }
    }
}

/// May `actor` escalate the issue? Only the filing citizen can.
pub fn authorize_escalation(actor: &Actor, issue: &IssueSubject) -> Result<(), CoreError> {
    match actor {
        Actor::Citizen { citizen_id, .. } if *citizen_id == issue.citizen_id => Ok(()),
        Actor::Citizen { .. } => Err(not_found(issue)),
        Actor::Official { .. } | Actor::HigherOfficial { .. } => Err(CoreError::Forbidden(
            "Only the citizen who filed an issue may escalate it".into(),
        )),
    }
}

/// Only citizens file issues. Returns the citizen profile id to own it.
pub fn authorize_create(actor: &Actor) -> Result<DbId, CoreError> {
    match actor {
        Actor::Citizen { citizen_id, .. } => Ok(*citizen_id),
        _ => Err(CoreError::Forbidden("Only citizens may file issues".into())),
    }
}

/// Rows an actor sees when listing issues.
pub fn list_scope(actor: &Actor, policy: AccessPolicy) -> ListScope {
    match actor {
        Actor::Citizen { citizen_id, .. } => ListScope {
            citizen_id: Some(*citizen_id),
            ..ListScope::default()
        },
        Actor::Official { categories, .. } => ListScope {
            citizen_id: None,
            category_ids: Some(categories.iter().copied().collect()),
            exclude_escalated: !policy.officials_handle_escalated,
        },
        Actor::HigherOfficial { .. } => ListScope::default(),
    }
}

/// Rows an actor's dashboard counts cover.
///
/// Same as [`list_scope`] except officials also count escalated issues in
/// their categories, so the per-status totals add up. Higher officials count
/// everything they can list, whatever their category assignments.
pub fn count_scope(actor: &Actor) -> ListScope {
    ListScope {
        exclude_escalated: false,
        ..list_scope(actor, AccessPolicy::default())
    }
}
