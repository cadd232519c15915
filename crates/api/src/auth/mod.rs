//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification and policy checks.
//! - [`jwt`] -- JWT bearer-token generation and validation.

pub mod jwt;
pub mod password;
