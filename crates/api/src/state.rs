use std::sync::Arc;

use reelbase_core::image_store::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reelbase_db::DbPool,
    /// Server configuration (JWT settings, password policy, storage paths).
    pub config: Arc<ServerConfig>,
    /// Where uploaded movie images are written.
    pub image_store: Arc<dyn ImageStore>,
}
