//! JWT bearer-token generation and validation.
//!
//! Tokens are HS512-signed JWTs containing a [`Claims`] payload. Issuer and
//! audience come from [`JwtConfig`] and are checked on every validation.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reelbase_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub email: String,
    /// Display name; the username.
    pub given_name: String,
    /// The user's role name (`"Admin"` or `"User"`).
    pub role: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// The user a token is issued for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: DbId,
    pub username: &'a str,
    pub email: &'a str,
    pub role: &'a str,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA512 secret used to sign and verify tokens.
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in days (default: 7).
    pub token_expiry_days: i64,
}

/// Default token expiry in days.
const DEFAULT_EXPIRY_DAYS: i64 = 7;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Token lifetime in seconds for `days`, or `None` when `days` is not
/// positive or the product overflows.
fn expiry_secs(days: i64) -> Option<i64> {
    if days <= 0 {
        return None;
    }
    days.checked_mul(SECS_PER_DAY)
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default            |
    /// |-------------------|----------|--------------------|
    /// | `JWT_SECRET`      | **yes**  | --                 |
    /// | `JWT_ISSUER`      | no       | `reelbase`         |
    /// | `JWT_AUDIENCE`    | no       | `reelbase-clients` |
    /// | `JWT_EXPIRY_DAYS` | no       | `7`                |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if `JWT_EXPIRY_DAYS`
    /// is not positive or too large to express in seconds.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "reelbase".into());
        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "reelbase-clients".into());

        let token_expiry_days: i64 = std::env::var("JWT_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_EXPIRY_DAYS must be a valid i64");
        assert!(
            expiry_secs(token_expiry_days).is_some(),
            "JWT_EXPIRY_DAYS must be positive and small enough to express in seconds"
        );

        Self {
            secret,
            issuer,
            audience,
            token_expiry_days,
        }
    }

    /// Token lifetime in seconds.
    ///
    /// Saturates for values `from_env` would have refused.
    pub fn expires_in_secs(&self) -> i64 {
        self.token_expiry_days.max(0).saturating_mul(SECS_PER_DAY)
    }
}

/// Generate an HS512 bearer token for the given user.
pub fn generate_access_token(
    subject: TokenSubject<'_>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: subject.user_id,
        email: subject.email.to_string(),
        given_name: subject.username.to_string(),
        role: subject.role.to_string(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        iat: now,
        exp: now.saturating_add(config.expires_in_secs()),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a bearer token, returning the embedded [`Claims`].
///
/// Checks the signature, expiration, issuer and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: "reelbase".to_string(),
            audience: "reelbase-clients".to_string(),
            token_expiry_days: 7,
        }
    }

    fn alice() -> TokenSubject<'static> {
        TokenSubject {
            user_id: 42,
            username: "alice",
            email: "alice@example.com",
            role: "User",
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token =
            generate_access_token(alice(), &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.given_name, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expiry_secs_rejects_overflow_and_non_positive() {
        assert_eq!(expiry_secs(7), Some(7 * 24 * 60 * 60));
        let max_days = i64::MAX / SECS_PER_DAY;
        assert_eq!(expiry_secs(max_days), Some(max_days * SECS_PER_DAY));
        assert_eq!(expiry_secs(max_days + 1), None);
        assert_eq!(expiry_secs(i64::MAX), None);
        assert_eq!(expiry_secs(0), None);
        assert_eq!(expiry_secs(-3), None);
    }

    #[test]
    fn test_expires_in_secs_saturates() {
        let config = JwtConfig {
            token_expiry_days: i64::MAX,
            ..test_config()
        };
        assert_eq!(config.expires_in_secs(), i64::MAX);
    }

    #[test]
    fn test_token_uses_hs512() {
        let token = generate_access_token(alice(), &test_config()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "a@example.com".to_string(),
            given_name: "a".to_string(),
            role: "User".to_string(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err(), "expired token must fail");
    }

    #[test]
    fn test_wrong_audience_or_issuer_fails() {
        let config = test_config();
        let token = generate_access_token(alice(), &config).unwrap();

        let other_audience = JwtConfig {
            audience: "someone-else".to_string(),
            ..test_config()
        };
        assert!(validate_token(&token, &other_audience).is_err());

        let other_issuer = JwtConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        };
        assert!(validate_token(&token, &other_issuer).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = generate_access_token(alice(), &test_config()).unwrap();
        let other = JwtConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };
        assert!(
            validate_token(&token, &other).is_err(),
            "token signed with a different secret must fail"
        );
    }
}
