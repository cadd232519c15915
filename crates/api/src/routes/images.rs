//! Route definitions for the `/images` resource.

use axum::routing::delete;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// DELETE /{image_id}?movieId=  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{image_id}", delete(images::delete))
}
