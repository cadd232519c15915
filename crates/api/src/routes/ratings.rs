//! Route definitions for the `/ratings` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::ratings;
use crate::state::AppState;

/// Routes mounted at `/ratings`.
///
/// ```text
/// PUT /{id}?rating=  -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(ratings::update))
}
