//! Route definitions for the `/issues` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::issues;
use crate::state::AppState;

/// Routes mounted at `/issues`.
///
/// ```text
/// GET  /                          -> list
/// POST /                          -> create (multipart)
/// GET  /{id}                      -> get_by_id
/// GET  /{id}/comments             -> list_comments
/// POST /{id}/comments             -> add_comment (multipart)
/// POST /{id}/escalate             -> escalate
/// POST /{id}/escalate/category    -> escalate_by_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issues::list).post(issues::create))
        .route("/{id}", get(issues::get_by_id))
        .route(
            "/{id}/comments",
            get(issues::list_comments).post(issues::add_comment),
        )
        .route("/{id}/escalate", post(issues::escalate))
        .route("/{id}/escalate/category", post(issues::escalate_by_category))
}
