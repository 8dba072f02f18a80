//! WebSocket message types for the moderator channel.
//!
//! Defines the protocol between server and a connected moderator:
//! - Server → Client: connection status, command acknowledgements, errors
//! - Client → Server: command envelopes (`{"event", "ack"?, "data"?}`)

use serde::Serialize;

use crate::application::{Acknowledgement, ModeratorContext, Reply};
use crate::domain::foundation::{ErrorCode, Timestamp};

/// Inbound frames are command envelopes.
pub use crate::application::CommandEnvelope as ClientMessage;

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once, right after the upgrade.
    Connected(ConnectedMessage),

    /// The single reply to an acknowledged command.
    Ack(AckMessage),

    /// A frame that could not be read as a command envelope.
    Error(ErrorMessage),
}

impl ServerMessage {
    pub fn connected(ctx: &ModeratorContext) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            moderator: ctx.username().to_string(),
            connection_id: ctx.connection_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.to_string(),
            message: message.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

impl From<Acknowledgement> for ServerMessage {
    fn from(ack: Acknowledgement) -> Self {
        ServerMessage::Ack(AckMessage {
            ack: ack.ack,
            data: ack.reply,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub moderator: String,
    pub connection_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AckMessage {
    pub ack: u64,
    pub data: Reply,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}
