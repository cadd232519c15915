//! Handlers for the `/me` resource: the caller's own comment and rating
//! history. The user is taken from the bearer token.

use axum::extract::State;
use axum::Json;
use reelbase_db::models::comment::UserComment;
use reelbase_db::models::rating::UserRating;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/v1/me/comments
pub async fn comments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserComment>>>> {
    let comments = UserService::get_all_user_comments(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// GET /api/v1/me/ratings
pub async fn ratings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserRating>>>> {
    let ratings = UserService::get_all_user_ratings(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: ratings }))
}
