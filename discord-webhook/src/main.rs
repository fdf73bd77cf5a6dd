//! Discord webhook server.
//!
//! Receives signed interaction requests from Discord on `/discord/event`
//! and relays the `/httpsms` slash command to the httpSMS API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use discord_webhook::command::{CommandHandler, HttpSmsGateway, SmsCommandHandler};
use discord_webhook::web::{router, AppState};
use discord_webhook::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // A missing or malformed public key must stop the server here.
    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        port = config.port,
        httpsms_api_url = %config.httpsms_api_url,
        httpsms_api_key_configured = config.httpsms_api_key.is_some(),
        request_timeout_ms = config.request_timeout_ms,
        "config_loaded"
    );

    let command_handler: Arc<dyn CommandHandler> = match config.httpsms_api_key.clone() {
        Some(api_key) => {
            let client = reqwest::Client::builder()
                .build()
                .context("Failed to build HTTP client")?;
            let gateway = HttpSmsGateway::new(
                client,
                config.httpsms_api_url.clone(),
                api_key,
                Duration::from_millis(config.request_timeout_ms),
            );
            Arc::new(SmsCommandHandler::new(Arc::new(gateway)))
        }
        None => {
            warn!("httpsms_api_key_missing");
            Arc::new(SmsCommandHandler::without_gateway())
        }
    };

    let state = AppState::new(config.discord_public_key, command_handler);
    let app = router(state);

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

/// Resolve on SIGINT, or SIGTERM on unix.
///
/// A signal that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "sigint_handler_unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal = received, "web_server_shutting_down");
}
