use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /statistics -> statistics
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/statistics", get(dashboard::statistics))
}
