pub mod auth;
pub mod django;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the proxied route tree.
///
/// ```text
/// /api/django/submissions              GET, POST
/// /api/django/submissions/{id}         GET
/// /api/django/submissions/{id}/judge   POST
/// /api/django/ranking                  GET (?type=, default weekly)
/// /api/django/admin/submissions        GET
/// /api/django/admin/reports            GET
/// /api/auth/jwt-login                  POST
/// ```
///
/// Submission uploads accept bodies up to `max_upload_bytes`; every other
/// route keeps axum's default limit.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/django", django::router(max_upload_bytes))
        .nest("/auth", auth::router())
}
