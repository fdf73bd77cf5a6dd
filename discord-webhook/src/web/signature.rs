//! Discord interaction signature verification.
//!
//! Discord signs every interaction request with Ed25519 over the timestamp
//! header followed by the raw request body.
//! Reference: https://discord.com/developers/docs/interactions/receiving-and-responding#security-and-authorization

use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use tracing::{info, warn};

use crate::config::ConfigError;

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";

/// Header carrying the timestamp that prefixes the signed message.
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// Discord application public key, decoded once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationKey(VerifyingKey);

impl VerificationKey {
    /// Decode a hex-encoded 32 byte Ed25519 public key.
    pub fn from_hex(encoded: &str) -> Result<Self, ConfigError> {
        let bytes = hex::decode(encoded)?;
        let bytes = <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
            ConfigError::PublicKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            }
        })?;

        Ok(Self(VerifyingKey::from_bytes(&bytes)?))
    }
}

impl From<VerifyingKey> for VerificationKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}

/// Verify a Discord interaction request.
///
/// # Arguments
///
/// * `key` - The application's public key
/// * `signature` - Raw `X-Signature-Ed25519` header bytes, empty if absent
/// * `timestamp` - Raw `X-Signature-Timestamp` header bytes, empty if absent
/// * `body` - The raw request body exactly as received
///
/// # Returns
///
/// `true` only if the signature is a valid Ed25519 signature of
/// `timestamp || body`. Every failure collapses to `false`; the reason is
/// only logged.
pub fn verify_interaction(
    key: &VerificationKey,
    signature: &[u8],
    timestamp: &[u8],
    body: &[u8],
) -> bool {
    if signature.is_empty() {
        info!(header = SIGNATURE_HEADER, "discord_signature_header_empty");
        return false;
    }

    let decoded = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(e) => {
            info!(error = %e, "discord_signature_not_hex");
            return false;
        }
    };

    let signature_bytes = match <[u8; SIGNATURE_LENGTH]>::try_from(decoded.as_slice()) {
        Ok(bytes) => bytes,
        Err(_) => {
            info!(
                expected_length = SIGNATURE_LENGTH,
                actual_length = decoded.len(),
                "discord_signature_invalid_length"
            );
            return false;
        }
    };

    if timestamp.is_empty() {
        info!(header = TIMESTAMP_HEADER, "discord_timestamp_header_empty");
        return false;
    }

    // The signed message is the timestamp followed by the body, byte for byte.
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp);
    message.extend_from_slice(body);

    let signature = Signature::from_bytes(&signature_bytes);

    match key.0.verify(&message, &signature) {
        Ok(()) => true,
        Err(_) => {
            warn!(
                timestamp = %String::from_utf8_lossy(timestamp),
                body_length = body.len(),
                "discord_signature_mismatch"
            );
            false
        }
    }
}
