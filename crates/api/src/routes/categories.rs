use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET / -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(categories::list))
}
