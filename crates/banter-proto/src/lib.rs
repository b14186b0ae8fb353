//! Wire contract for the banter chat protocol.
//!
//! Every event on the socket is one JSON text frame of the shape
//! `{"event": "<kind>", "data": <payload>}`. This crate defines the full
//! event set as a tagged enum ([`Event`]), the shared message and identity
//! types, and the envelope codec. Malformed frames and unknown kinds fail
//! decoding with a typed [`ProtocolError`] instead of passing through as
//! loosely-shaped values.
//!
//! # Components
//!
//! - [`Event`]: one variant per wire event kind, with the envelope codec
//! - [`WireMessage`]: a chat message as it crosses the wire
//! - [`Identity`] / [`Sender`]: display names and the `"system"` sentinel
//! - [`ProtocolError`]: encode/decode failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod message;

pub use error::ProtocolError;
pub use event::Event;
pub use message::{
    ID_RANDOM_BITS, Identity, MessageId, SYSTEM_SENDER, Sender, WireMessage, compose_message_id,
};
