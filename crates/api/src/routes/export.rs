//! Route definitions for the `/export` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(export::generate_csv))
}
