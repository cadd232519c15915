//! Handlers for comments: `/movies/{id}/comments` and `/comments/{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_core::types::DbId;
use reelbase_db::models::comment::{Comment, MovieComment};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::MovieService;
use crate::state::AppState;

/// Request body for creating or editing a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub description: String,
}

/// GET /api/v1/movies/{id}/comments
pub async fn list_for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MovieComment>>>> {
    let comments = MovieService::get_movie_comments(&state.pool, movie_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/movies/{id}/comments
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(movie_id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let comment =
        MovieService::add_comment(&state.pool, &input.description, user.user_id, movie_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let comment =
        MovieService::update_comment(&state.pool, id, user.user_id, &input.description).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/v1/comments/{id}
///
/// The author or an administrator may delete a comment.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    MovieService::delete_comment(&state.pool, id, user.user_id, user.is_admin()).await?;
    Ok(StatusCode::NO_CONTENT)
}
