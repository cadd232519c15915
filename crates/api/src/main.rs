use std::net::SocketAddr;
use std::sync::Arc;

use reelbase_api::config::{AdminBootstrap, ServerConfig};
use reelbase_api::router::build_app_router;
use reelbase_api::{bootstrap, state};
use reelbase_core::image_store::LocalImageStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let pool = prepare_database().await;

    if let Some(admin) = AdminBootstrap::from_env() {
        let created = bootstrap::ensure_admin(&pool, &admin, &config.password)
            .await
            .expect("Failed to bootstrap admin account");
        tracing::info!(username = %admin.username, created, "Admin account checked");
    } else {
        tracing::info!("ADMIN_USERNAME not configured, skipping admin bootstrap");
    }

    let image_store =
        LocalImageStore::new(&config.storage.image_dir, &config.storage.public_base_url);
    tracing::info!(
        dir = %image_store.root().display(),
        base_url = %config.storage.public_base_url,
        "Image store ready"
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_store: Arc::new(image_store),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "reelbase listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// `RUST_LOG` wins; otherwise debug for this crate and the HTTP layers.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reelbase_api=debug,reelbase_core=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify the connection and bring the schema up to date.
///
/// Any failure here aborts startup.
async fn prepare_database() -> reelbase_db::DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = reelbase_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    reelbase_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    reelbase_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready, migrations applied");
    pool
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
