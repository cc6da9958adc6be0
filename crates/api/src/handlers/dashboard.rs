//! Handlers for the `/dashboard` resource.

use axum::extract::State;
use axum::Json;
use civic_db::models::dashboard::StatusCounts;

use crate::error::AppResult;
use crate::middleware::actor::CurrentActor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/statistics
///
/// Issue counts per status over everything the caller is responsible for.
pub async fn statistics(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StatusCounts>>> {
    let counts = state.workflow.status_counts(&actor).await?;
    Ok(Json(DataResponse { data: counts }))
}
