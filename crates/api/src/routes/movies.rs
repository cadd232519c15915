//! Route definitions for the `/movies` resource.
//!
//! Also nests comment and rating creation under `/movies/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comments, movies, ratings};
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /                               -> list
/// POST   /                               -> create
/// GET    /search                         -> search
/// GET    /ordered-by-release-date-asc    -> ordered_by_release_date_asc
/// GET    /ordered-by-release-date-desc   -> ordered_by_release_date_desc
/// GET    /ordered-by-name-asc            -> ordered_by_name_asc
/// GET    /ordered-by-name-desc           -> ordered_by_name_desc
/// GET    /{id}                           -> get_by_id
/// PUT    /{id}                           -> update
/// DELETE /{id}                           -> delete
///
/// GET    /{id}/comments                  -> comments::list_for_movie
/// POST   /{id}/comments                  -> comments::create
/// POST   /{id}/ratings                   -> ratings::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route("/search", get(movies::search))
        .route(
            "/ordered-by-release-date-asc",
            get(movies::ordered_by_release_date_asc),
        )
        .route(
            "/ordered-by-release-date-desc",
            get(movies::ordered_by_release_date_desc),
        )
        .route("/ordered-by-name-asc", get(movies::ordered_by_name_asc))
        .route("/ordered-by-name-desc", get(movies::ordered_by_name_desc))
        .route(
            "/{id}",
            get(movies::get_by_id)
                .put(movies::update)
                .delete(movies::delete),
        )
        .route(
            "/{id}/comments",
            get(comments::list_for_movie).post(comments::create),
        )
        .route("/{id}/ratings", post(ratings::create))
}
