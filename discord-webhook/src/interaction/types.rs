//! Inbound interaction payload types.
//!
//! The body is decoded in two steps: the numeric `type` discriminant is
//! extracted and validated first, then only the fields of that variant are
//! parsed.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Discord `PING` interaction.
pub const HANDSHAKE_TYPE: u64 = 1;

/// Discord `APPLICATION_COMMAND` interaction.
pub const COMMAND_INVOCATION_TYPE: u64 = 2;

/// Errors raised while interpreting a verified interaction body.
///
/// All of these map to a bad request; the message is safe to return.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("cannot decode interaction body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("interaction body must be a JSON object")]
    NotAnObject,

    #[error("interaction is missing the type field")]
    MissingType,

    #[error("interaction type [{0}] is not numeric")]
    NonNumericType(String),

    #[error("interaction type [{0}] is not a non-negative whole number")]
    InvalidType(String),

    #[error("unknown interaction type [{0}]")]
    UnknownType(u64),

    #[error("cannot decode command data: {0}")]
    InvalidCommandData(#[source] serde_json::Error),
}

/// A verified interaction, keyed on its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPayload {
    /// Endpoint validation ping (type 1)
    Handshake,
    /// Slash command invocation (type 2)
    CommandInvocation(CommandInvocation),
    /// Any other integer discriminant
    Unrecognized(u64),
}

impl InteractionPayload {
    /// Decode a raw request body.
    ///
    /// Only call this after the body's signature has been verified.
    pub fn from_slice(body: &[u8]) -> Result<Self, InteractionError> {
        let value: Value = serde_json::from_slice(body).map_err(InteractionError::InvalidJson)?;

        let kind = match value.as_object().ok_or(InteractionError::NotAnObject)?.get("type") {
            None | Some(Value::Null) => return Err(InteractionError::MissingType),
            Some(Value::Number(number)) => discriminant(number)
                .ok_or_else(|| InteractionError::InvalidType(number.to_string()))?,
            Some(raw) => return Err(InteractionError::NonNumericType(raw.to_string())),
        };

        match kind {
            HANDSHAKE_TYPE => Ok(InteractionPayload::Handshake),
            COMMAND_INVOCATION_TYPE => serde_json::from_value(value)
                .map(InteractionPayload::CommandInvocation)
                .map_err(InteractionError::InvalidCommandData),
            other => Ok(InteractionPayload::Unrecognized(other)),
        }
    }
}

/// Whole non-negative numbers, so `1` and `1.0` both count as a handshake.
fn discriminant(number: &serde_json::Number) -> Option<u64> {
    if let Some(kind) = number.as_u64() {
        return Some(kind);
    }

    let value = number.as_f64()?;
    if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

/// Slash command invocation.
///
/// Only the fields a command handler needs are decoded; everything else
/// Discord sends is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandInvocation {
    /// Interaction ID
    #[serde(default)]
    pub id: Option<String>,
    /// Guild the command was invoked in, absent for DMs
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Channel the command was invoked in
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Command name and options
    pub data: CommandData,
}

/// Command name and the options the user filled in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// A single command option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl CommandData {
    /// Look up a string option by name.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_ref())
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_handshake() {
        let payload = InteractionPayload::from_slice(br#"{"type":1,"id":"123"}"#).unwrap();
        assert_eq!(payload, InteractionPayload::Handshake);
    }

    #[test]
    fn test_decode_command_invocation() {
        let body = br#"{
            "type": 2,
            "id": "1100",
            "guild_id": "42",
            "data": {
                "name": "httpsms",
                "options": [
                    {"name": "from", "type": 3, "value": "+18005550100"},
                    {"name": "to", "type": 3, "value": "+18005550199"},
                    {"name": "message", "type": 3, "value": "Hello World"}
                ]
            }
        }"#;

        match InteractionPayload::from_slice(body).unwrap() {
            InteractionPayload::CommandInvocation(invocation) => {
                assert_eq!(invocation.id.as_deref(), Some("1100"));
                assert_eq!(invocation.data.name, "httpsms");
                assert_eq!(invocation.data.option_str("to"), Some("+18005550199"));
                assert_eq!(invocation.data.option_str("message"), Some("Hello World"));
                assert_eq!(invocation.data.option_str("missing"), None);
            }
            other => panic!("Expected CommandInvocation, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_unrecognized() {
        let payload = InteractionPayload::from_slice(br#"{"type":99}"#).unwrap();
        assert_eq!(payload, InteractionPayload::Unrecognized(99));
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(matches!(
            InteractionPayload::from_slice(b"not json"),
            Err(InteractionError::InvalidJson(_))
        ));
        assert!(matches!(
            InteractionPayload::from_slice(b""),
            Err(InteractionError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_decode_not_an_object() {
        assert!(matches!(
            InteractionPayload::from_slice(b"[1]"),
            Err(InteractionError::NotAnObject)
        ));
    }

    #[test]
    fn test_decode_missing_type() {
        assert!(matches!(
            InteractionPayload::from_slice(b"{}"),
            Err(InteractionError::MissingType)
        ));
        assert!(matches!(
            InteractionPayload::from_slice(br#"{"type":null}"#),
            Err(InteractionError::MissingType)
        ));
    }

    #[test]
    fn test_decode_non_numeric_type() {
        let bodies: [&[u8]; 3] = [br#"{"type":"1"}"#, br#"{"type":true}"#, br#"{"type":[1]}"#];

        for body in bodies {
            assert!(matches!(
                InteractionPayload::from_slice(body),
                Err(InteractionError::NonNumericType(_))
            ));
        }
    }

    #[test]
    fn test_decode_whole_float_type() {
        assert_eq!(
            InteractionPayload::from_slice(br#"{"type":1.0}"#).unwrap(),
            InteractionPayload::Handshake
        );
        assert_eq!(
            InteractionPayload::from_slice(br#"{"type":99.0}"#).unwrap(),
            InteractionPayload::Unrecognized(99)
        );
        assert!(matches!(
            InteractionPayload::from_slice(br#"{"type":2.0,"data":{"name":"httpsms"}}"#),
            Ok(InteractionPayload::CommandInvocation(_))
        ));
    }

    #[test]
    fn test_decode_invalid_numeric_type() {
        let bodies: [&[u8]; 3] = [br#"{"type":1.5}"#, br#"{"type":-1}"#, br#"{"type":-2.0}"#];

        for body in bodies {
            assert!(matches!(
                InteractionPayload::from_slice(body),
                Err(InteractionError::InvalidType(_))
            ));
        }
    }

    #[test]
    fn test_decode_command_without_data() {
        assert!(matches!(
            InteractionPayload::from_slice(br#"{"type":2}"#),
            Err(InteractionError::InvalidCommandData(_))
        ));
    }
}
