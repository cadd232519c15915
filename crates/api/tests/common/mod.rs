//! Shared helpers for the HTTP integration tests.
//!
//! Every test builds the production router via [`build_app_router`] over a
//! fresh `#[sqlx::test]` database and a temporary image directory, then
//! drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reelbase_api::auth::jwt::JwtConfig;
use reelbase_api::auth::password::PasswordPolicy;
use reelbase_api::config::{ServerConfig, StorageConfig};
use reelbase_api::router::build_app_router;
use reelbase_api::services::UserService;
use reelbase_api::state::AppState;
use reelbase_core::image_store::LocalImageStore;
use reelbase_core::roles::ROLE_ADMIN;
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Password that satisfies the default policy.
pub const PASSWORD: &str = "Secret1!";

/// Base URL baked into image locators during tests.
pub const PUBLIC_BASE_URL: &str = "http://localhost:3000";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A router plus the temporary directory holding its uploaded images.
///
/// The directory is deleted when this value is dropped.
pub struct TestApp {
    pub router: Router,
    pub storage: TempDir,
    pub config: ServerConfig,
}

impl TestApp {
    /// A fresh handle on the router, ready for `oneshot`.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Number of files currently in the image directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.storage.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        issuer: "reelbase".to_string(),
        audience: "reelbase-clients".to_string(),
        token_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` storing images under `image_dir`.
pub fn test_config(image_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        jwt: test_jwt_config(),
        storage: StorageConfig {
            image_dir: image_dir.to_path_buf(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
        },
        password: PasswordPolicy::default(),
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack production uses.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let storage = tempfile::tempdir().expect("temp dir should be created");
    let config = test_config(storage.path());

    let image_store = LocalImageStore::new(storage.path(), PUBLIC_BASE_URL);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_store: Arc::new(image_store),
    };

    TestApp {
        router: build_app_router(state, &config),
        storage,
        config,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Register `username` through the API and return `(user_id, token)`.
pub async fn register(app: Router, username: &str) -> (i64, String) {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["data"]["id"].as_i64().expect("session carries the user id"),
        json["data"]["token"]
            .as_str()
            .expect("session carries a token")
            .to_string(),
    )
}

/// Create an `Admin` account directly and return a bearer token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    let user = UserService::create_with_role(
        pool,
        &PasswordPolicy::default(),
        "admin",
        "admin@example.com",
        PASSWORD,
        ROLE_ADMIN,
    )
    .await
    .expect("admin creation should succeed");
    UserService::issue_session(pool, &test_jwt_config(), &user)
        .await
        .expect("session should be issued")
        .token
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Read the full response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    json_auth(app, Method::POST, uri, body, token).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    json_auth(app, Method::PUT, uri, body, token).await
}

async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    body: Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Send a body-less request with a bearer token (POST/PUT with query
/// parameters, DELETE).
pub async fn empty_auth(app: Router, method: Method, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    empty_auth(app, Method::DELETE, uri, token).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "reelbase-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A complete, valid movie form without files.
pub fn movie_form(name: &str, release_date: &str) -> MultipartForm {
    MultipartForm::new()
        .text("name", name)
        .text("description", &format!("{name} description"))
        .text("releaseDate", release_date)
        .text("directorName", "Director")
        .text("length", "120")
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    form: MultipartForm,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

/// Create a movie through the API as `token` and return its id.
pub async fn create_movie(app: Router, token: &str, name: &str, release_date: &str) -> i64 {
    let response = multipart_auth(
        app,
        Method::POST,
        "/api/v1/movies",
        movie_form(name, release_date),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("movie id")
}
