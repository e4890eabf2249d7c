use std::net::SocketAddr;
use std::sync::Arc;

use gamedash_clients::{
    build_http_client, HttpDownloadClient, HttpGameClient, HttpUpstream, HttpUserClient,
};
use gamedash_core::dashboard::DashboardService;
use gamedash_core::store::{InMemorySnapshotStore, SnapshotStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamedash_api::config::{ServerConfig, StoreBackend, UpstreamConfig};
use gamedash_api::router::build_app_router;
use gamedash_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gamedash_api=debug,gamedash_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.snapshot_store,
        "Loaded server configuration"
    );

    // --- Snapshot store ---
    let store = build_store(&config).await;

    // --- Upstream clients ---
    let dashboards = build_dashboard_service(&config.upstream, store);
    tracing::info!(
        user_service = %config.upstream.user_service_url,
        game_service = %config.upstream.game_service_url,
        download_service = %config.upstream.download_service_url,
        timeout_secs = config.upstream.timeout_secs,
        "Upstream clients configured"
    );

    // --- App state & router ---
    let state = AppState { dashboards };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Connect the configured snapshot store, running migrations for Postgres.
async fn build_store(config: &ServerConfig) -> Arc<dyn SnapshotStore> {
    match config.snapshot_store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set when SNAPSHOT_STORE=postgres");

            let pool = gamedash_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            gamedash_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            gamedash_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(gamedash_db::PgSnapshotStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory snapshot store; snapshots are lost on restart");
            Arc::new(InMemorySnapshotStore::new())
        }
    }
}

/// Wire the three HTTP adapters (sharing one connection pool) into the
/// aggregation service.
fn build_dashboard_service(
    upstream: &UpstreamConfig,
    store: Arc<dyn SnapshotStore>,
) -> DashboardService {
    let timeout = upstream.timeout();
    let http = build_http_client(timeout).expect("Failed to build reqwest HTTP client");

    let users = HttpUserClient::new(HttpUpstream::with_client(
        http.clone(),
        upstream.user_service_url.as_str(),
        timeout,
    ));
    let games = HttpGameClient::new(HttpUpstream::with_client(
        http.clone(),
        upstream.game_service_url.as_str(),
        timeout,
    ));
    let downloads = HttpDownloadClient::new(HttpUpstream::with_client(
        http,
        upstream.download_service_url.as_str(),
        timeout,
    ));

    DashboardService::new(Arc::new(users), Arc::new(games), Arc::new(downloads), store)
        .with_upstream_timeout(timeout)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
