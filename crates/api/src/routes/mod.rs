pub mod export;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /jobs               POST   submit a document
/// /jobs/{id}          GET    poll job status / fetch result
/// /export             POST   serialize tables to CSV
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/export", export::router())
}
