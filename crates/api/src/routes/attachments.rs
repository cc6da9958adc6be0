use axum::routing::get;
use axum::Router;

use crate::handlers::attachments;
use crate::state::AppState;

/// Routes mounted at `/attachments`.
///
/// ```text
/// GET /{id} -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(attachments::download))
}
