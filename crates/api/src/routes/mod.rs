pub mod auth;
pub mod comments;
pub mod health;
pub mod images;
pub mod me;
pub mod movies;
pub mod ratings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /movies                                          list, create (admin)
/// /movies/search?name=                             case-insensitive name search
/// /movies/ordered-by-release-date-{asc,desc}       ordered listings
/// /movies/ordered-by-name-{asc,desc}
/// /movies/{id}                                     get, update (admin), delete (admin)
/// /movies/{id}/comments                            list, create (auth)
/// /movies/{id}/ratings?rating=                     create (auth)
///
/// /comments/{id}                                   update (owner), delete (owner or admin)
/// /ratings/{id}?rating=                            update (owner)
/// /images/{image_id}?movieId=                      delete (admin)
///
/// /me/comments                                     caller's comments (auth)
/// /me/ratings                                      caller's ratings (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/movies", movies::router())
        .nest("/comments", comments::router())
        .nest("/ratings", ratings::router())
        .nest("/images", images::router())
        .nest("/me", me::router())
}
