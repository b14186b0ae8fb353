//! The tagged event set and JSON envelope codec.
//!
//! Payloads on the wire are adjacently tagged: the `event` field carries
//! the kind, the `data` field carries the kind's exact payload shape. One
//! enum variant per kind means a frame whose payload does not match its
//! kind is rejected at decode time instead of flowing through the client
//! as a loosely-shaped value.
//!
//! # Invariants
//!
//! Each variant maps to exactly one kind tag (enforced by match
//! exhaustiveness in [`Event::kind`]). Round-trip encoding must produce
//! identical values.

use serde::{Deserialize, Serialize};

use crate::{
    error::ProtocolError,
    message::{Identity, MessageId, WireMessage},
};

/// All wire events.
///
/// Directionality is a server concern, not a type-level one: the client
/// encodes the client→server kinds and decodes the server→client kinds,
/// but the codec itself is symmetric so test harnesses can speak both
/// sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum Event {
    /// Announce presence and request the roster (client → server).
    Join(Identity),
    /// System-level announcement, already formatted for display
    /// (server → client).
    RoomNotice(String),
    /// Full roster replacement, authoritative ordering included
    /// (server → client).
    OnlineRoster(Vec<Identity>),
    /// One chat message (bidirectional; the backend never echoes a
    /// message back to its author).
    ChatMessage(WireMessage),
    /// A user began composing (bidirectional).
    TypingStart(Identity),
    /// A user stopped composing (bidirectional).
    TypingStop(Identity),
    /// Batched read acknowledgment for the listed ids (client → server).
    MarkRead(Vec<MessageId>),
    /// Which of the local user's messages were read (server → client).
    MessagesRead(Vec<MessageId>),
}

impl Event {
    /// Inbound frames larger than this are rejected before JSON parsing
    /// begins, so a hostile peer cannot feed the parser unbounded input.
    pub const MAX_FRAME_LEN: usize = 64 * 1024;

    /// The kind tag for this event, as it appears in the envelope.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::RoomNotice(_) => "room-notice",
            Self::OnlineRoster(_) => "online-roster",
            Self::ChatMessage(_) => "chat-message",
            Self::TypingStart(_) => "typing-start",
            Self::TypingStop(_) => "typing-stop",
            Self::MarkRead(_) => "mark-read",
            Self::MessagesRead(_) => "messages-read",
        }
    }

    /// Encode into a JSON envelope.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if serialization fails
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Decode a JSON envelope.
    ///
    /// Size validation happens before parsing. Unknown kinds are rejected
    /// rather than silently ignored, so a newer peer's events surface as
    /// decode errors the caller can log and drop.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooLarge` if the frame exceeds
    ///   [`Event::MAX_FRAME_LEN`]
    /// - `ProtocolError::Decode` if the envelope is malformed, the kind is
    ///   unknown, or the payload shape does not match the kind
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        if text.len() > Self::MAX_FRAME_LEN {
            return Err(ProtocolError::FrameTooLarge {
                size: text.len(),
                max: Self::MAX_FRAME_LEN,
            });
        }

        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}
