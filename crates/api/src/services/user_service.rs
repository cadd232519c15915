//! User aggregation service: registration, credential checks, sessions and
//! the per-user comment/rating histories.

use reelbase_core::error::CoreError;
use reelbase_core::roles::ROLE_USER;
use reelbase_core::types::DbId;
use reelbase_db::models::comment::UserComment;
use reelbase_db::models::rating::UserRating;
use reelbase_db::models::user::{CreateUser, User};
use reelbase_db::repositories::{CommentRepo, RatingRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use crate::auth::password::{hash_password, verify_password, PasswordPolicy};
use crate::error::{AppError, AppResult};
use crate::services::movie_service::non_empty;

/// Message for every failed login, whatever the cause.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile plus bearer token, returned by register and login.
#[derive(Debug, Serialize)]
pub struct Session {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Account lifecycle and per-user views.
pub struct UserService;

impl UserService {
    /// Register a new account with the `User` role and open a session for it.
    pub async fn create_user(
        pool: &PgPool,
        policy: &PasswordPolicy,
        jwt: &JwtConfig,
        input: &RegisterRequest,
    ) -> AppResult<Session> {
        input.validate()?;

        let user = Self::create_with_role(
            pool,
            policy,
            &input.username,
            &input.email,
            &input.password,
            ROLE_USER,
        )
        .await?;
        Self::issue_session(pool, jwt, &user).await
    }

    /// Create an account with the given role after checking the password
    /// policy and username availability.
    pub async fn create_with_role(
        pool: &PgPool,
        policy: &PasswordPolicy,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> AppResult<User> {
        policy
            .validate(password)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

        if Self::find_user(pool, username).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Username '{username}' is already taken"
            ))));
        }

        let role_row = RoleRepo::find_by_name(pool, role).await?.ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!("Role '{role}' is not seeded")))
        })?;

        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let user = UserRepo::create(
            pool,
            &CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role_id: role_row.id,
            },
        )
        .await?;

        tracing::info!(user_id = user.id, username = %user.username, role, "User created");
        Ok(user)
    }

    /// Case-insensitive lookup by username.
    pub async fn find_user(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
        Ok(UserRepo::find_by_username(pool, username).await?)
    }

    /// Check `password` against the user's stored hash.
    pub fn authenticate_credentials(user: &User, password: &str) -> AppResult<bool> {
        verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
    }

    /// Verify username and password and open a session.
    ///
    /// Unknown users and wrong passwords produce the same 401.
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtConfig,
        input: &LoginRequest,
    ) -> AppResult<Session> {
        let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

        let user = Self::find_user(pool, &input.username)
            .await?
            .ok_or_else(invalid)?;

        if !Self::authenticate_credentials(&user, &input.password)? {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid());
        }

        Self::issue_session(pool, jwt, &user).await
    }

    /// Build the session payload with a freshly signed token.
    pub async fn issue_session(
        pool: &PgPool,
        jwt: &JwtConfig,
        user: &User,
    ) -> AppResult<Session> {
        let role = RoleRepo::resolve_name(pool, user.role_id).await?;

        let token = generate_access_token(
            TokenSubject {
                user_id: user.id,
                username: &user.username,
                email: &user.email,
                role: &role,
            },
            jwt,
        )
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

        Ok(Session {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role,
            token,
            expires_in: jwt.expires_in_secs(),
        })
    }

    pub async fn get_all_user_comments(
        pool: &PgPool,
        user_id: DbId,
    ) -> AppResult<Vec<UserComment>> {
        non_empty(CommentRepo::list_for_user(pool, user_id).await?, "comments")
    }

    pub async fn get_all_user_ratings(
        pool: &PgPool,
        user_id: DbId,
    ) -> AppResult<Vec<UserRating>> {
        non_empty(RatingRepo::list_for_user(pool, user_id).await?, "ratings")
    }
}
