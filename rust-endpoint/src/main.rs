//! FlowGate Web Server - encrypted flow webhook endpoint.
//!
//! This binary serves the platform-facing HTTP surface:
//! - `POST /` runs the encrypted flow exchange
//! - `GET /webhook` answers subscription verification
//! - `GET /` and `GET /health` are liveness probes
//!
//! The private key and app secret are loaded once before serving begins
//! and shared read-only across all requests.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowgate::crypto::load_private_key;
use flowgate::web::{flow_webhook, health, index, verify_subscription, AppState};
use flowgate::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        app_secret_configured = config.app_secret.is_some(),
        verify_token_configured = config.verify_token.is_some(),
        inline_private_key = config.private_key_pem.is_some(),
        "config_loaded"
    );

    if config.app_secret.is_none() {
        warn!("app_secret_not_configured_signature_verification_disabled");
    }

    // Parse the private key once; every request borrows it read-only.
    let pem = config.read_private_key_pem()?;
    let private_key = load_private_key(&pem, &config.passphrase)?;
    info!("private_key_loaded");

    // Create application state
    let state = AppState::new(config.clone(), private_key);

    // Build the router
    let app = Router::new()
        .route("/", get(index).post(flow_webhook))
        .route("/health", get(health))
        .route("/webhook", get(verify_subscription))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
