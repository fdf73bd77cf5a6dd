//! Interaction dispatch.
//!
//! Turns a verified request body into exactly one synchronous response.
//!
//! ## Flow
//!
//! ```text
//! body → InteractionPayload::from_slice() → dispatch() → InteractionResponse
//! ```

pub mod response;
pub mod types;

use tracing::{info, warn};

use crate::command::CommandHandler;

pub use response::{Embed, EmbedField, InteractionResponse, MessageData};
pub use types::{
    CommandData, CommandInvocation, CommandOption, InteractionError, InteractionPayload,
};

/// Route a decoded interaction to its response.
///
/// Command invocations wait for `handler` to finish; there is no deferred
/// reply.
pub async fn dispatch(
    payload: InteractionPayload,
    handler: &dyn CommandHandler,
) -> Result<InteractionResponse, InteractionError> {
    match payload {
        InteractionPayload::Handshake => {
            info!("discord_handshake_acknowledged");
            Ok(InteractionResponse::Acknowledge)
        }
        InteractionPayload::CommandInvocation(invocation) => {
            let outcome = handler.handle(&invocation).await;
            info!(
                command = %invocation.data.name,
                success = outcome.is_success(),
                "discord_command_handled"
            );
            Ok(InteractionResponse::from_outcome(&outcome))
        }
        InteractionPayload::Unrecognized(kind) => {
            warn!(interaction_type = kind, "discord_interaction_type_unknown");
            Err(InteractionError::UnknownType(kind))
        }
    }
}

/// Decode a verified body and dispatch it.
pub async fn handle_interaction(
    body: &[u8],
    handler: &dyn CommandHandler,
) -> Result<InteractionResponse, InteractionError> {
    let payload = InteractionPayload::from_slice(body)?;
    dispatch(payload, handler).await
}
