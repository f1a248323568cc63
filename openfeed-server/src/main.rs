//! Openfeed Server
//!
//! Watches a Circles `circles_query` endpoint for $OPEN transfer events and
//! pushes each new one to connected WebSocket clients.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use openfeed_core::events::transfer_broadcast_channel;
use openfeed_core::processors::TransferMonitor;
use openfeed_core::rpc::CirclesRpcClient;
use server::{build_router, run_server};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Openfeed - real-time $OPEN transfer feed server
#[derive(Parser, Debug)]
#[command(name = "openfeed-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./openfeed-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, env = "OPENFEED_LISTEN")]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting openfeed-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen);
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Create the notification channel and the RPC client
    let (transfer_tx, _) = transfer_broadcast_channel();
    let rpc = CirclesRpcClient::new(config.monitor.rpc_url.clone());

    // Spawn the transfer monitor; its first poll fires immediately
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let monitor = TransferMonitor::new(
        rpc.clone(),
        config.monitor.monitor_config(),
        transfer_tx.clone(),
    );
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));
    tracing::info!(
        "Monitoring {} via RPC at {}",
        config.monitor.table_label(),
        config.monitor.rpc_url
    );

    // Create application state
    let state = AppState::new(rpc, config.monitor, transfer_tx);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop the monitor and wait for it to wind down
    let _ = shutdown_tx.send(true);
    if let Err(e) = monitor_handle.await {
        tracing::error!("Transfer monitor task failed: {}", e);
    }

    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
