//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup. A missing or malformed Discord public
//! key is fatal: the webhook cannot authenticate anything without it.

use std::env;

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::web::signature::VerificationKey;

/// Default base URL of the httpSMS API.
pub const DEFAULT_HTTPSMS_API_URL: &str = "https://api.httpsms.com";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("DISCORD_PUBLIC_KEY is not valid hex: {0}")]
    PublicKeyHex(#[from] hex::FromHexError),

    #[error("DISCORD_PUBLIC_KEY is not a valid Ed25519 public key: {0}")]
    PublicKey(#[from] ed25519_dalek::SignatureError),

    #[error("DISCORD_PUBLIC_KEY must decode to {expected} bytes, got {actual}")]
    PublicKeyLength { expected: usize, actual: usize },

    #[error("HTTPSMS_API_URL is not a valid URL: {0}")]
    GatewayUrl(#[from] url::ParseError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Discord application public key, decoded once
    pub discord_public_key: VerificationKey,

    /// Base URL of the httpSMS API
    pub httpsms_api_url: Url,

    /// API key for the httpSMS API; SMS commands fail cleanly without it
    pub httpsms_api_key: Option<String>,

    /// Timeout for outbound gateway requests in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let public_key = env::var("DISCORD_PUBLIC_KEY")
            .map_err(|_| ConfigError::Missing("DISCORD_PUBLIC_KEY"))?;

        let api_url = env::var("HTTPSMS_API_URL")
            .unwrap_or_else(|_| DEFAULT_HTTPSMS_API_URL.to_string());

        Ok(Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            discord_public_key: VerificationKey::from_hex(public_key.trim())?,

            httpsms_api_url: Url::parse(api_url.trim())?,

            httpsms_api_key: parse_secret("HTTPSMS_API_KEY"),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        })
    }
}

/// Read an optional secret, treating blank values as unset.
fn parse_secret(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        Ok(_) => {
            warn!(env_var = name, "blank_secret_ignored");
            None
        }
        Err(_) => None,
    }
}
