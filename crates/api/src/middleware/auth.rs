//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use reelbase_core::error::CoreError;
use reelbase_core::roles::ROLE_ADMIN;
use reelbase_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, as identified by a valid `Authorization: Bearer <jwt>` header.
///
/// Taking this extractor makes a handler reject anonymous requests with 401
/// before any service code runs. Ownership checks use `user_id`, admin
/// overrides use [`AuthUser::is_admin`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// From `claims.sub`.
    pub user_id: DbId,
    /// From `claims.given_name`.
    pub username: String,
    /// `"Admin"` or `"User"`.
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map_err(unauthorized)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.given_name,
            role: claims.role,
        })
    }
}

/// Pull the token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Authorization header is not valid text")?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or("Invalid Authorization format. Expected: Bearer <token>")
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
