//! Handlers for ratings: `/movies/{id}/ratings` and `/ratings/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_core::types::DbId;
use reelbase_db::models::rating::Rating;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::MovieService;
use crate::state::AppState;

/// Query parameters carrying the score, e.g. `?rating=8`.
#[derive(Debug, Deserialize)]
pub struct RatingParams {
    pub rating: i32,
}

/// POST /api/v1/movies/{id}/ratings?rating=
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(movie_id): Path<DbId>,
    Query(params): Query<RatingParams>,
) -> AppResult<(StatusCode, Json<DataResponse<Rating>>)> {
    let rating =
        MovieService::add_rating(&state.pool, movie_id, params.rating, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rating })))
}

/// PUT /api/v1/ratings/{id}?rating=
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<RatingParams>,
) -> AppResult<Json<DataResponse<Rating>>> {
    let rating = MovieService::update_rating(&state.pool, id, user.user_id, params.rating).await?;
    Ok(Json(DataResponse { data: rating }))
}
