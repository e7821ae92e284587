//! RTSP Smart IDE server
//!
//! Main entry point.

use rtsp_smart_ide::{
    config_store::StreamStore,
    health_probe::HealthProbe,
    registry::StreamRegistry,
    state::{AppConfig, AppState},
    supervisor::RelaySupervisor,
    web_api,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtsp_smart_ide=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RTSP Smart IDE server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        host = %config.host,
        port = config.port,
        config_dir = %config.config_dir.display(),
        relay_bin = %config.relay_command.bin,
        stop_timeout_sec = config.stop_timeout.as_secs(),
        restart_max_retries = config.restart_policy.max_retries,
        "Configuration loaded"
    );

    // Initialize components
    let store = Arc::new(StreamStore::new(config.config_dir.clone()).await?);
    tracing::info!("ConfigStore initialized");

    let supervisor = RelaySupervisor::new(config.relay_command.clone());
    match supervisor.check_relay().await {
        Ok(version) => tracing::info!(version = %version, "Relay binary available"),
        Err(e) => tracing::warn!(error = %e, "Relay binary check failed, stream starts will error"),
    }

    let registry = StreamRegistry::new(
        store.clone(),
        supervisor,
        config.stop_timeout,
        config.restart_policy.clone(),
    );
    tracing::info!("StreamRegistry initialized");

    let monitor = Arc::new(HealthProbe::new());

    // Create application state
    let state = AppState {
        config,
        store,
        registry: registry.clone(),
        monitor,
        started_at: Instant::now(),
    };

    // Create router
    let app = web_api::create_router(state.clone())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain supervised relays before exiting
    tracing::info!("Shutting down, stopping active relays");
    registry.shutdown_all().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
    }
}
