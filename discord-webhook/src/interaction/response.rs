//! Interaction response types.
//!
//! Reference: https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-response-object

use serde::{Serialize, Serializer};

use crate::command::{CommandField, CommandOutcome};

/// Discord `PONG` response type.
pub const ACKNOWLEDGE_TYPE: u8 = 1;

/// Discord `CHANNEL_MESSAGE_WITH_SOURCE` response type.
pub const COMMAND_RESULT_TYPE: u8 = 4;

/// Synchronous reply to a verified interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionResponse {
    /// Reply to a handshake, serialized as `{"type":1}`
    Acknowledge,
    /// Message shown in the channel the command was invoked from
    CommandResult(MessageData),
}

impl InteractionResponse {
    /// Build the reply for a finished command.
    ///
    /// Failures get one title embed per reason, followed by an embed holding
    /// the echoed request fields.
    pub fn from_outcome(outcome: &CommandOutcome) -> Self {
        let data = match outcome {
            CommandOutcome::Succeeded { message, fields } => MessageData {
                content: message.clone(),
                embeds: fields_embed(fields).into_iter().collect(),
            },
            CommandOutcome::Failed {
                message,
                reasons,
                fields,
            } => MessageData {
                content: message.clone(),
                embeds: reasons
                    .iter()
                    .map(|reason| Embed::titled(&reason.title, reason.category.color()))
                    .chain(fields_embed(fields))
                    .collect(),
            },
        };

        InteractionResponse::CommandResult(data)
    }

    /// The numeric `type` sent to Discord.
    pub fn response_type(&self) -> u8 {
        match self {
            InteractionResponse::Acknowledge => ACKNOWLEDGE_TYPE,
            InteractionResponse::CommandResult(_) => COMMAND_RESULT_TYPE,
        }
    }
}

impl Serialize for InteractionResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            #[serde(rename = "type")]
            kind: u8,
            #[serde(skip_serializing_if = "Option::is_none")]
            data: Option<&'a MessageData>,
        }

        let data = match self {
            InteractionResponse::Acknowledge => None,
            InteractionResponse::CommandResult(data) => Some(data),
        };

        Wire {
            kind: self.response_type(),
            data,
        }
        .serialize(serializer)
    }
}

/// Message body of a command result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub content: String,
    pub embeds: Vec<Embed>,
}

/// A rich embed: either a coloured title or a list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn titled(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: Some(title.into()),
            color: Some(color),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(fields: Vec<EmbedField>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "is_false")]
    pub inline: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn fields_embed(fields: &[CommandField]) -> Option<Embed> {
    if fields.is_empty() {
        return None;
    }

    Some(Embed::with_fields(
        fields
            .iter()
            .map(|field| EmbedField {
                name: field.label.clone(),
                value: field.value.clone(),
                inline: field.inline,
            })
            .collect(),
    ))
}
