//! Handlers for the `/images` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use reelbase_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::services::MovieService;
use crate::state::AppState;

/// Query parameters for `DELETE /images/{image_id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteImageParams {
    #[serde(rename = "movieId", alias = "movie_id")]
    pub movie_id: DbId,
}

/// DELETE /api/v1/images/{image_id}?movieId= (admin only)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(image_id): Path<DbId>,
    Query(params): Query<DeleteImageParams>,
) -> AppResult<StatusCode> {
    MovieService::delete_image(&state.pool, &*state.image_store, image_id, params.movie_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
