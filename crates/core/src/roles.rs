//! Well-known role name constants.
//!
//! These must match the seed data in `20240601000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_USER: &str = "User";
