//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::Json;
use civic_db::models::category::IssueCategory;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Active categories, for the issue filing form.
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<IssueCategory>>>> {
    let categories = state.workflow.list_categories().await?;
    Ok(Json(DataResponse { data: categories }))
}
