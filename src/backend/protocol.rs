//! Wire format for the backend websocket.
//!
//! # Frames
//! - Outbound: `{"user_id": string, "message": string}`
//! - Inbound: `{"user_id": string, "type": string, "content": string}`
//!   where `content` is only meaningful when `type == "chat"`.
//!
//! # Design Decisions
//! - Inbound frames with a tag other than `chat` still complete the exchange,
//!   but with a fixed marker string instead of chat content
//! - Unknown extra fields are ignored rather than rejected

use serde::{Deserialize, Serialize};

/// Content substituted when an inbound frame carries a type tag other than
/// `chat`, or a `chat` frame arrives without content.
pub const UNRECOGNIZED_TYPE_CONTENT: &str = "unrecognized message type";

/// Type tag identifying a conversational reply.
const CHAT_TYPE: &str = "chat";

/// Message sent to the backend over the active session.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundFrame {
    pub user_id: String,
    pub message: String,
}

impl OutboundFrame {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
        }
    }
}

/// Message received asynchronously from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    /// Routing key back to the pending exchange.
    pub user_id: String,

    /// Raw type tag as sent by the backend.
    #[serde(rename = "type")]
    pub kind: String,

    /// Chat content; absent for non-chat frames.
    #[serde(default)]
    pub content: Option<String>,
}

impl InboundFrame {
    /// Reply text carried by this frame, with the fallback marker substituted
    /// for anything that is not a well-formed chat frame.
    pub fn into_content(self) -> String {
        match (self.kind.as_str(), self.content) {
            (CHAT_TYPE, Some(content)) => content,
            _ => UNRECOGNIZED_TYPE_CONTENT.to_string(),
        }
    }
}
