//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use civic_core::error::{AuthFailure, CoreError};
use civic_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// A missing or non-Bearer header is [`AuthFailure::Missing`]; a token that
/// fails validation carries the failure reported by
/// [`validate_token`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    ///
    /// The token's role claim is not carried over: the role on the user row
    /// is what authorization decides on.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let missing = || AppError::Core(CoreError::Unauthorized(AuthFailure::Missing));

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(missing)?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|failure| AppError::Core(CoreError::Unauthorized(failure)))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
