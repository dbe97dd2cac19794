//! notekeep-api - HTTP API server for notekeep

use notekeep_api::{build_router, connect_store, telemetry, ApiConfig, AppState};
use tracing::{info, warn};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env();
    let _file_guard = telemetry::init_tracing(&config.log);
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    info!(
        log_format = ?config.log.format,
        log_file = ?config.log.file,
        environment = ?config.environment,
        "Logging initialized"
    );

    let notes = connect_store(&config).await?;
    let state = AppState::new(notes, config.environment.exposes_error_detail());
    let app = build_router(state, &config.allowed_origins);

    // Start server
    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
