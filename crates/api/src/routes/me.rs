//! Route definitions for the `/me` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET /comments  -> comments
/// GET /ratings   -> ratings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(me::comments))
        .route("/ratings", get(me::ratings))
}
