mod models;
mod handlers;
mod routes;
mod docs;
mod config;
mod clients;
mod utils;
mod websocket;
mod ws;

use std::sync::Arc;
use config::Config;
use clients::execution_client::ExecutionClient;
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use std::panic;
use ws::Relay;

/// State shared by every HTTP handler and WebSocket session
pub struct AppState {
    pub config: Config,
    pub relay: Arc<Relay>,
    pub executor: ExecutionClient,
}

#[tokio::main]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Load configuration
    let config_result = Config::load();
    let log_level = config_result
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to the configured level, but allow debug for our app
            format!("code_sync_relay=debug,tower_http=debug,{}", log_level).into()
        }))
        .init();

    info!("Starting server...");

    let config = config_result.unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Client for the external code execution service
    let executor = ExecutionClient::new(config.execution_api_url.clone(), config.execution_timeout())
        .unwrap_or_else(|e| panic!("Failed to build execution client: {}", e));

    let address = config.server_address();
    let app_state = Arc::new(AppState {
        config,
        relay: Arc::new(Relay::new()),
        executor,
    });
    let app = routes::create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", address));

    info!("🚀 Server running on http://{}", address);
    info!("📡 WebSocket relay available at ws://{}/ws", address);
    info!("📚 Swagger UI available at http://{}/swagger", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed to start");

    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
