//! Webhook endpoint handlers.
//!
//! The Discord endpoint:
//! 1. Verifies the Ed25519 signature over the raw body
//! 2. Decodes and dispatches the interaction
//! 3. Answers synchronously with the interaction response

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::command::CommandHandler;
use crate::interaction::handle_interaction;
use crate::web::signature::{
    verify_interaction, VerificationKey, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub verification_key: VerificationKey,
    pub command_handler: Arc<dyn CommandHandler>,
}

impl AppState {
    pub fn new(verification_key: VerificationKey, command_handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            verification_key,
            command_handler,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Discord Interactions
// =============================================================================

/// Error body for rejected requests.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Discord interactions endpoint.
///
/// Verification failures get a bare 401; the reason is only logged.
/// Payload errors get a 400 carrying the parse error.
pub async fn discord_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header_value(&headers, SIGNATURE_HEADER);
    let timestamp = header_value(&headers, TIMESTAMP_HEADER);

    info!(
        body_length = body.len(),
        has_signature = !signature.is_empty(),
        has_timestamp = !timestamp.is_empty(),
        "discord_event_received"
    );

    if !verify_interaction(&state.verification_key, signature, timestamp, &body) {
        warn!("discord_event_unauthorized");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                status: "unauthorized",
                message: None,
            }),
        )
            .into_response();
    }

    match handle_interaction(&body, state.command_handler.as_ref()).await {
        Ok(response) => {
            info!(response_type = response.response_type(), "discord_event_handled");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "discord_event_bad_request");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    status: "bad_request",
                    message: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Raw header bytes, empty when absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a [u8] {
    headers.get(name).map(|v| v.as_bytes()).unwrap_or_default()
}
