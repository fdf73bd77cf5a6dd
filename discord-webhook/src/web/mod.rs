//! Web server module for the Discord interactions webhook.
//!
//! This module provides a small web server that:
//! - Receives signed interaction requests from Discord
//! - Rejects anything whose Ed25519 signature does not verify
//! - Answers handshakes and slash commands synchronously

pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{discord_event, health, AppState, ErrorResponse, HealthResponse};
pub use signature::{verify_interaction, VerificationKey, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/discord/event", post(discord_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
