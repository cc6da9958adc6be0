//! Resolve the authenticated caller into a workflow [`Actor`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use civic_core::roles::Actor;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The caller with their role-specific profile loaded.
///
/// The role comes from the database row, not the token claim, so access
/// rules always see the account as it is now.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let actor = state.workflow.resolve_actor(user.user_id).await?;
        Ok(CurrentActor(actor))
    }
}
