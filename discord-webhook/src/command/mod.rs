//! Command handling seam.
//!
//! The dispatcher hands every slash command to a [`CommandHandler`] and waits
//! for its [`CommandOutcome`]. Business failures are part of the outcome,
//! never an error: Discord expects a message response either way.

pub mod gateway;
pub mod sms;

use async_trait::async_trait;

use crate::interaction::CommandInvocation;

pub use gateway::{GatewayError, HttpSmsGateway, SmsGateway, SmsMessage};
pub use sms::{SmsCommandHandler, SEND_SMS_COMMAND};

/// Executes the side effect behind a slash command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, invocation: &CommandInvocation) -> CommandOutcome;
}

/// Category of a command failure, rendered as the embed colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The user supplied invalid or missing input
    Validation,
    /// The downstream service could not be reached or refused the request
    Delivery,
    /// The command is unknown or not enabled
    Unsupported,
}

impl FailureCategory {
    /// Discord embed colour for this category.
    pub fn color(self) -> u32 {
        match self {
            FailureCategory::Validation => 14681092,
            FailureCategory::Delivery => 15105570,
            FailureCategory::Unsupported => 9807270,
        }
    }
}

/// One human-readable reason a command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub category: FailureCategory,
    pub title: String,
}

impl FailureReason {
    pub fn new(category: FailureCategory, title: impl Into<String>) -> Self {
        Self {
            category,
            title: title.into(),
        }
    }
}

/// A labelled value echoed back to the user, e.g. `From:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandField {
    pub label: String,
    pub value: String,
    pub inline: bool,
}

impl CommandField {
    pub fn new(label: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded {
        message: String,
        fields: Vec<CommandField>,
    },
    Failed {
        message: String,
        reasons: Vec<FailureReason>,
        fields: Vec<CommandField>,
    },
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded { .. })
    }
}
