use std::path::Path;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dyngate::config::{load_config, GatewayConfig};
use dyngate::http::GatewayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dyngate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("dyngate v0.1.0 starting");

    // Load configuration from the optional path argument
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        soap_endpoint = %config.backend.soap_endpoint,
        backend_timeout_secs = config.timeouts.backend_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    // Create and run the gateway
    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
