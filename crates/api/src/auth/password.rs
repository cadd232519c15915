//! Argon2id password hashing, verification, and strength validation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Default minimum password length.
const DEFAULT_MIN_LENGTH: usize = 6;

/// Strength rules a new password must satisfy.
///
/// Beyond the minimum length, a password needs at least one digit, one
/// lowercase letter, one uppercase letter and one non-alphanumeric character.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `PASSWORD_MIN_LENGTH` | `6`     |
    pub fn from_env() -> Self {
        let min_length: usize = std::env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| DEFAULT_MIN_LENGTH.to_string())
            .parse()
            .expect("PASSWORD_MIN_LENGTH must be a valid usize");
        Self { min_length }
    }

    /// Check `password` against every rule.
    ///
    /// Returns `Err` with one human-readable sentence per failed rule.
    pub fn validate(&self, password: &str) -> Result<(), String> {
        let mut problems = Vec::new();

        if password.chars().count() < self.min_length {
            problems.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            problems.push("Password must contain a digit".to_string());
        }
        if !password.chars().any(char::is_lowercase) {
            problems.push("Password must contain a lowercase letter".to_string());
        }
        if !password.chars().any(char::is_uppercase) {
            problems.push("Password must contain an uppercase letter".to_string());
        }
        if password.chars().all(char::is_alphanumeric) {
            problems.push("Password must contain a non-alphanumeric character".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(". "))
        }
    }
}
