//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn new(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = reelbase_db::health_check(&state.pool).await;
    if let Err(e) = &db {
        tracing::warn!(error = %e, "Database health check failed");
    }
    Json(HealthResponse::new(db.is_ok()))
}

/// `GET /health`
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
