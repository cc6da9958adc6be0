//! Handlers for the `/attachments` resource.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use civic_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::actor::CurrentActor;
use crate::state::AppState;

/// GET /api/v1/attachments/{id}
///
/// Download a stored file with its original name and content type.
pub async fn download(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let blob = state.workflow.get_attachment(&actor, id).await?;

    let mimetype = if blob.mimetype.is_ascii() && !blob.mimetype.is_empty() {
        blob.mimetype
    } else {
        "application/octet-stream".to_string()
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_filename(&blob.filename)
    );

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, mimetype), (CONTENT_DISPOSITION, disposition)],
        blob.data,
    ))
}

/// Reduce a stored filename to printable ASCII without quotes or backslashes.
fn header_safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}
