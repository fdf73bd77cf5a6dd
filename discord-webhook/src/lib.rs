//! Discord interactions webhook for httpSMS.
//!
//! Verifies that inbound interaction requests were signed by Discord, then
//! answers them synchronously: handshakes are acknowledged and the `/httpsms`
//! slash command is relayed to the SMS gateway.
//!
//! ## Architecture
//!
//! ```text
//! Discord → /discord/event → signature check → dispatch → CommandHandler → SMS gateway
//! ```

pub mod command;
pub mod config;
pub mod interaction;
pub mod web;

// Re-export commonly used types
pub use command::{CommandHandler, CommandOutcome, HttpSmsGateway, SmsCommandHandler};
pub use config::{Config, ConfigError};
pub use interaction::{InteractionError, InteractionPayload, InteractionResponse};
pub use web::{AppState, VerificationKey};
