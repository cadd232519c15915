//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::user_service::{LoginRequest, RegisterRequest, Session};
use crate::services::UserService;
use crate::state::AppState;

/// POST /api/v1/auth/register
///
/// Create an account with the `User` role and return a session for it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Session>>)> {
    let session =
        UserService::create_user(&state.pool, &state.config.password, &state.config.jwt, &input)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = UserService::login(&state.pool, &state.config.jwt, &input).await?;
    Ok(Json(DataResponse { data: session }))
}
