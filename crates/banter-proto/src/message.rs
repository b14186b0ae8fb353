//! Message and identity types shared across the protocol.
//!
//! The wire shape of a chat message is exactly four fields (`id`, `sender`,
//! `text`, `ts`). Local ledger annotations such as read flags never
//! serialize; they live in the client crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel sender name for synthetic system entries (join announcements
/// and similar). Never a valid user identity: [`Identity::parse`] output is
/// compared against user input, while this constant is produced only by
/// the backend or the local ledger.
pub const SYSTEM_SENDER: &str = "system";

/// Message identifier.
///
/// Wall-clock milliseconds shifted left [`ID_RANDOM_BITS`] bits, OR'd with
/// a random suffix. Time-ordered (monotonic-ish), distinct for messages
/// authored in the same millisecond, and below 2^53 so a JavaScript peer
/// reads it exactly.
pub type MessageId = u64;

/// Bits of random suffix in a [`MessageId`].
pub const ID_RANDOM_BITS: u32 = 10;

/// Compose a [`MessageId`] from a millisecond timestamp and fresh entropy.
///
/// Only the low [`ID_RANDOM_BITS`] bits of `entropy` are used. Collisions
/// remain possible (two messages in the same millisecond drawing the same
/// suffix); the ledger resolves them last-write-wins rather than treating
/// them as corruption.
#[must_use]
pub const fn compose_message_id(unix_millis: u64, entropy: u64) -> MessageId {
    (unix_millis << ID_RANDOM_BITS) | (entropy & ((1 << ID_RANDOM_BITS) - 1))
}

/// A user's display name, the equality key for message ownership.
///
/// Chosen once per session via the join action. [`Identity::parse`] is the
/// validation point for locally-supplied names; identities arriving on the
/// wire (roster entries, typing signals, message senders) deserialize
/// as-is because the backend is the source of truth for its own peers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse a locally-supplied display name.
    ///
    /// Trims surrounding whitespace and returns `None` when nothing
    /// remains. Invalid names are dropped silently; callers skip the
    /// operation instead of surfacing an error.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// The display name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a ledger entry: a user identity or the system sentinel.
///
/// Serializes as a plain string; the literal `"system"` round-trips to
/// [`Sender::System`]. Keeping the sentinel a distinct variant means code
/// that computes "mine / theirs / unread" can never confuse a system
/// notice with a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    /// Synthetic entry authored by the room itself.
    System,
    /// Entry authored by a user.
    User(Identity),
}

impl Sender {
    /// True for the system sentinel.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }

    /// The authoring identity, unless this is a system entry.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::System => None,
            Self::User(identity) => Some(identity),
        }
    }
}

impl From<Identity> for Sender {
    fn from(identity: Identity) -> Self {
        Self::User(identity)
    }
}

impl From<String> for Sender {
    fn from(raw: String) -> Self {
        if raw == SYSTEM_SENDER { Self::System } else { Self::User(Identity(raw)) }
    }
}

impl From<Sender> for String {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::System => SYSTEM_SENDER.to_owned(),
            Sender::User(identity) => identity.0,
        }
    }
}

/// A chat message as it crosses the wire.
///
/// Timestamps are authoring wall-clock time and exist for display only;
/// ledger order is arrival order, never a sort over `ts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Unique message id. See [`compose_message_id`].
    pub id: MessageId,
    /// Author of the message.
    pub sender: Sender,
    /// Message body. May contain newlines.
    pub text: String,
    /// Authoring time in Unix milliseconds.
    pub ts: u64,
}
