pub mod attachments;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod issues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         citizen registration (public)
/// /auth/login                            login (public)
/// /auth/me                               profile (requires auth)
///
/// /categories                            active categories
///
/// /issues                                list, create (multipart)
/// /issues/{id}                           detail + attachments
/// /issues/{id}/comments                  list, add comment + status (multipart)
/// /issues/{id}/escalate                  manual escalation
/// /issues/{id}/escalate/category         category timeout escalation
///
/// /attachments/{id}                      download
///
/// /dashboard/statistics                  status counts for the caller
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/issues", issues::router())
        .nest("/attachments", attachments::router())
        .nest("/dashboard", dashboard::router())
}
