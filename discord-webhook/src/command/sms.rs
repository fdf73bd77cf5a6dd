//! `/httpsms` slash command handler.
//!
//! Validates the `from`, `to` and `message` options, then hands the message
//! to the configured [`SmsGateway`]. Every problem ends up as a
//! [`FailureReason`] so the user sees why nothing was sent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::gateway::{GatewayError, SmsGateway, SmsMessage};
use super::{CommandField, CommandHandler, CommandOutcome, FailureCategory, FailureReason};
use crate::interaction::CommandInvocation;

/// Name of the slash command that sends an SMS.
pub const SEND_SMS_COMMAND: &str = "httpsms";

const FROM_OPTION: &str = "from";
const TO_OPTION: &str = "to";
const MESSAGE_OPTION: &str = "message";

const SENT_MESSAGE: &str = "✔ sending SMS message";
const FAILED_MESSAGE: &str = "*⚠ could not send SMS message*";

/// Discord rejects embed field values longer than this.
const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// Sends an SMS for every valid `/httpsms` invocation.
#[derive(Clone)]
pub struct SmsCommandHandler {
    gateway: Option<Arc<dyn SmsGateway>>,
}

impl SmsCommandHandler {
    pub fn new(gateway: Arc<dyn SmsGateway>) -> Self {
        Self {
            gateway: Some(gateway),
        }
    }

    /// Handler for deployments without gateway credentials.
    ///
    /// Input is still validated, but valid commands fail with a
    /// "not configured" reason.
    pub fn without_gateway() -> Self {
        Self { gateway: None }
    }
}

#[async_trait]
impl CommandHandler for SmsCommandHandler {
    async fn handle(&self, invocation: &CommandInvocation) -> CommandOutcome {
        let data = &invocation.data;

        info!(
            command = %data.name,
            interaction_id = ?invocation.id,
            guild_id = ?invocation.guild_id,
            option_count = data.options.len(),
            "sms_command_received"
        );

        let from = data.option_str(FROM_OPTION).map(str::trim).unwrap_or("");
        let to = data.option_str(TO_OPTION).map(str::trim).unwrap_or("");
        let content = data.option_str(MESSAGE_OPTION).unwrap_or("");

        let fields = summary_fields(from, to, content);

        if data.name != SEND_SMS_COMMAND {
            warn!(command = %data.name, "sms_command_unknown");
            return failed(
                vec![FailureReason::new(
                    FailureCategory::Unsupported,
                    format!("Unknown command `{}`", data.name),
                )],
                fields,
            );
        }

        let mut reasons = Vec::new();
        check_phone_number(TO_OPTION, to, &mut reasons);
        check_phone_number(FROM_OPTION, from, &mut reasons);
        if content.trim().is_empty() {
            reasons.push(required(MESSAGE_OPTION));
        }

        if !reasons.is_empty() {
            info!(reason_count = reasons.len(), "sms_command_invalid");
            return failed(reasons, fields);
        }

        let Some(gateway) = self.gateway.as_ref() else {
            warn!("sms_command_gateway_not_configured");
            return failed(
                vec![FailureReason::new(
                    FailureCategory::Unsupported,
                    "SMS sending is not configured for this integration",
                )],
                fields,
            );
        };

        let message = SmsMessage {
            from: from.to_string(),
            to: to.to_string(),
            content: content.to_string(),
        };

        match gateway.send(&message).await {
            Ok(()) => {
                info!("sms_command_sent");
                CommandOutcome::Succeeded {
                    message: SENT_MESSAGE.to_string(),
                    fields,
                }
            }
            Err(e) => {
                warn!(error = %e, "sms_command_send_failed");
                failed(vec![gateway_failure(&e)], fields)
            }
        }
    }
}

fn failed(reasons: Vec<FailureReason>, fields: Vec<CommandField>) -> CommandOutcome {
    CommandOutcome::Failed {
        message: FAILED_MESSAGE.to_string(),
        reasons,
        fields,
    }
}

fn required(field: &str) -> FailureReason {
    FailureReason::new(
        FailureCategory::Validation,
        format!("The {} field is required", field),
    )
}

fn check_phone_number(field: &str, value: &str, reasons: &mut Vec<FailureReason>) {
    if value.is_empty() {
        reasons.push(required(field));
    } else if !is_phone_number(value) {
        reasons.push(FailureReason::new(
            FailureCategory::Validation,
            format!("The {} field is not a valid phone number", field),
        ));
    }
}

/// E.164: a `+` followed by 8 to 15 digits.
fn is_phone_number(value: &str) -> bool {
    match value.strip_prefix('+') {
        Some(digits) => {
            (8..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

fn gateway_failure(error: &GatewayError) -> FailureReason {
    let title = match error {
        GatewayError::Transport(_) => "The SMS gateway could not be reached".to_string(),
        GatewayError::Rejected { status, .. } => {
            format!("The SMS gateway rejected the message (status {})", status)
        }
        GatewayError::Url(_) => "The SMS gateway URL is misconfigured".to_string(),
    };
    FailureReason::new(FailureCategory::Delivery, title)
}

/// The `From:`, `To:` and `Content:` fields echoed back to the user.
fn summary_fields(from: &str, to: &str, content: &str) -> Vec<CommandField> {
    vec![
        CommandField::new("From:", display_value(from), true),
        CommandField::new("To:", display_value(to), true),
        CommandField::new("Content:", display_value(content), false),
    ]
}

/// Discord rejects empty field values, and long ones are cut off.
fn display_value(value: &str) -> String {
    if value.trim().is_empty() {
        return "-".to_string();
    }
    if value.chars().count() <= MAX_FIELD_VALUE_CHARS {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(MAX_FIELD_VALUE_CHARS - 1).collect();
    truncated.push('…');
    truncated
}
