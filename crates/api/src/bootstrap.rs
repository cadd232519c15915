//! One-time startup data: the administrator account.
//!
//! Roles are seeded by migration. The admin account is created from
//! [`AdminBootstrap`] the first time the server starts with it configured.

use reelbase_core::roles::ROLE_ADMIN;
use sqlx::PgPool;

use crate::auth::password::PasswordPolicy;
use crate::config::AdminBootstrap;
use crate::error::AppResult;
use crate::services::UserService;

/// Create the configured admin account unless a user with that name exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(
    pool: &PgPool,
    admin: &AdminBootstrap,
    policy: &PasswordPolicy,
) -> AppResult<bool> {
    if UserService::find_user(pool, &admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Admin account already present");
        return Ok(false);
    }

    let user = UserService::create_with_role(
        pool,
        policy,
        &admin.username,
        &admin.email,
        &admin.password,
        ROLE_ADMIN,
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Admin account bootstrapped");
    Ok(true)
}
