//! Resolve an authenticated user into an [`Actor`].

use civic_core::error::{AuthFailure, CoreError};
use civic_core::roles::{Actor, Role, Scope};
use civic_core::types::DbId;
use civic_db::repositories::{CitizenRepo, OfficialRepo, UserRepo};

use crate::{IssueWorkflow, WorkflowResult};

impl IssueWorkflow {
    /// Load the caller's role-specific profile.
    ///
    /// The role is read from the `users` row, not trusted from the token, so
    /// a stale token cannot act under a role the account no longer has. A
    /// missing user is an invalid credential; a missing profile is
    /// `Forbidden`.
    pub async fn resolve_actor(&self, user_id: DbId) -> WorkflowResult<Actor> {
        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(CoreError::Unauthorized(AuthFailure::Invalid))?;

        match Role::parse(&user.role)? {
            Role::Citizen => {
                let citizen = CitizenRepo::find_by_user_id(&self.pool, user_id)
                    .await?
                    .ok_or_else(|| CoreError::Forbidden("Citizen profile not found".into()))?;
                Ok(Actor::Citizen {
                    user_id,
                    citizen_id: citizen.id,
                })
            }
            role @ (Role::Official | Role::HigherOfficial) => {
                let official = OfficialRepo::find_by_user_id(&self.pool, user_id)
                    .await?
                    .ok_or_else(|| CoreError::Forbidden("Official profile not found".into()))?;
                let category_ids = OfficialRepo::list_category_ids(&self.pool, official.id).await?;

                if role == Role::Official {
                    Ok(Actor::Official {
                        user_id,
                        official_id: official.id,
                        categories: category_ids.into_iter().collect(),
                    })
                } else {
                    Ok(Actor::HigherOfficial {
                        user_id,
                        official_id: official.id,
                        scope: Scope::from_assignments(category_ids),
                    })
                }
            }
        }
    }
}
