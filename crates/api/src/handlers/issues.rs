//! Handlers for the `/issues` resource.
//!
//! Filing and commenting take `multipart/form-data` so files travel with the
//! request; escalation takes JSON.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use civic_core::issue_status::IssueStatus;
use civic_core::pagination::Page;
use civic_core::types::DbId;
use civic_db::models::issue::IssueSummary;
use civic_workflow::{
    CommentOutcome, CommentRequest, CommentView, EscalationOutcome, IssueDetail, NewIssue,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::form::MultipartForm;
use crate::middleware::actor::CurrentActor;
use crate::query::IssueListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /issues/{id}/escalate`.
///
/// Missing fields deserialize as empty and fail validation with a field name.
#[derive(Debug, Deserialize)]
pub struct EscalateRequest {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub note: String,
}

/// Request body for `POST /issues/{id}/escalate/category`. Both optional.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryEscalateRequest {
    pub reason: Option<String>,
    pub note: Option<String>,
}

/// POST /api/v1/issues
///
/// File an issue. Multipart fields: `category_id`, `title` (optional),
/// `description`, and any number of file parts (up to the per-request limit).
pub async fn create(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<IssueDetail>>)> {
    let form = MultipartForm::read(multipart).await?;

    let input = NewIssue {
        category_id: form.required_id("category_id")?,
        title: form.text("title").map(str::to_string),
        description: form.text("description").unwrap_or_default().to_string(),
        attachments: form.files,
    };

    let detail = state.workflow.create_issue(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/issues?status=&page=&limit=
///
/// Issues visible to the caller, newest first.
pub async fn list(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Query(params): Query<IssueListParams>,
) -> AppResult<Json<DataResponse<Page<IssueSummary>>>> {
    let status = params.status_filter()?;
    let page = state
        .workflow
        .list_issues(&actor, status, params.page, params.limit)
        .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/issues/{id}
pub async fn get_by_id(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<IssueDetail>>> {
    let detail = state.workflow.get_issue(&actor, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/issues/{id}/comments
///
/// Comments oldest first, each with its files.
pub async fn list_comments(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentView>>>> {
    let comments = state.workflow.list_comments(&actor, id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/issues/{id}/comments
///
/// Official action: optional `comment`, required target `status`, optional
/// `expected_status` (the status the client last saw), and file parts. The
/// comment, status change and files are stored together or not at all.
pub async fn add_comment(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CommentOutcome>>)> {
    let form = MultipartForm::read(multipart).await?;

    let status = IssueStatus::parse(form.required("status")?)?;
    let expected_status = match form.text("expected_status").map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(IssueStatus::parse(raw)?),
    };

    let request = CommentRequest {
        comment: form.text("comment").map(str::to_string),
        status,
        expected_status,
        attachments: form.files,
    };

    let outcome = state.workflow.add_comment(&actor, id, request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// POST /api/v1/issues/{id}/escalate
///
/// Manual escalation by the citizen who filed the issue.
pub async fn escalate(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EscalateRequest>,
) -> AppResult<Json<DataResponse<EscalationOutcome>>> {
    let outcome = state
        .workflow
        .escalate_manual(&actor, id, &input.reason, &input.note)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/issues/{id}/escalate/category
///
/// Escalation once the category's waiting period has passed. Answers 422
/// with `hours_remaining` when it is too early.
pub async fn escalate_by_category(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CategoryEscalateRequest>,
) -> AppResult<Json<DataResponse<EscalationOutcome>>> {
    let outcome = state
        .workflow
        .escalate_by_category(
            &actor,
            id,
            input.reason.as_deref(),
            input.note.as_deref(),
            Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}
