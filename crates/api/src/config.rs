use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;
use crate::auth::password::PasswordPolicy;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// JWT token configuration (secret, issuer, audience, expiry).
    pub jwt: JwtConfig,
    /// Where uploaded movie images live and how they are addressed.
    pub storage: StorageConfig,
    /// Rules new passwords must satisfy.
    pub password: PasswordPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
            password: PasswordPolicy::from_env(),
        }
    }
}

/// Default request body cap: 10 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Image storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory uploaded movie images are written to.
    pub image_dir: PathBuf,
    /// Externally visible base URL of this server, used to build image locators.
    pub public_base_url: String,
}

impl StorageConfig {
    /// | Env Var             | Default                  |
    /// |---------------------|--------------------------|
    /// | `IMAGE_STORAGE_DIR` | `storage/images/movies`  |
    /// | `PUBLIC_BASE_URL`   | `http://localhost:3000`  |
    pub fn from_env() -> Self {
        let image_dir = std::env::var("IMAGE_STORAGE_DIR")
            .unwrap_or_else(|_| "storage/images/movies".into())
            .into();
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            image_dir,
            public_base_url,
        }
    }
}

/// Credentials for the administrator account created at startup.
///
/// Only present when all of `ADMIN_USERNAME`, `ADMIN_EMAIL` and
/// `ADMIN_PASSWORD` are set and non-empty.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminBootstrap {
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            username: var("ADMIN_USERNAME")?,
            email: var("ADMIN_EMAIL")?,
            password: var("ADMIN_PASSWORD")?,
        })
    }
}
