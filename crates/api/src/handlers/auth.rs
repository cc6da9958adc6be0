//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use civic_core::error::{AuthFailure, CoreError};
use civic_core::roles::{Role, ROLE_CITIZEN};
use civic_core::types::DbId;
use civic_core::validation;
use civic_db::models::citizen::{Citizen, CreateCitizen};
use civic_db::models::official::Official;
use civic_db::models::user::{CreateUser, UserResponse};
use civic_db::repositories::{CitizenRepo, OfficialRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A newly registered citizen account.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub citizen: Citizen,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The caller's account with its role-specific profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizen: Option<Citizen>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official: Option<Official>,
    /// Category assignments; empty for citizens.
    pub category_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Citizen self-registration. The user row and citizen profile are created
/// in one transaction.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RegisterResponse>>)> {
    let name = input.name.trim();
    let email = input.email.trim().to_lowercase();
    let phone = input.phone.trim();
    let address = input.address.trim();

    validation::validate_name(name)?;
    validation::validate_email(&email)?;
    validation::validate_password(&input.password)?;
    validation::validate_phone(phone)?;
    validation::validate_address(address)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut tx,
        &CreateUser {
            name: name.to_string(),
            email,
            password_hash,
            role: ROLE_CITIZEN.to_string(),
        },
    )
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration for the same address.
        if is_unique_violation(&e, "uq_users_email") {
            email_taken()
        } else {
            AppError::Database(e)
        }
    })?;
    let citizen = CitizenRepo::create(
        &mut tx,
        &CreateCitizen {
            user_id: user.id,
            phone: phone.to_string(),
            address: address.to_string(),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, citizen_id = citizen.id, "Citizen registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegisterResponse {
                user: user.into(),
                citizen,
            },
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Unknown email and wrong password
/// produce the same error.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(AuthFailure::Invalid));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            token_type: "Bearer",
            expires_in: state.config.jwt.expires_in_secs(),
            user: user.into(),
        },
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::Unauthorized(AuthFailure::Invalid))?;

    let mut profile = ProfileResponse {
        user: user.clone().into(),
        citizen: None,
        official: None,
        category_ids: Vec::new(),
    };

    match Role::parse(&user.role)? {
        Role::Citizen => {
            profile.citizen = CitizenRepo::find_by_user_id(&state.pool, user.id).await?;
        }
        Role::Official | Role::HigherOfficial => {
            if let Some(official) = OfficialRepo::find_by_user_id(&state.pool, user.id).await? {
                profile.category_ids =
                    OfficialRepo::list_category_ids(&state.pool, official.id).await?;
                profile.official = Some(official);
            }
        }
    }

    Ok(Json(DataResponse { data: profile }))
}

fn email_taken() -> AppError {
    AppError::Core(CoreError::Conflict("Email is already registered".into()))
}
