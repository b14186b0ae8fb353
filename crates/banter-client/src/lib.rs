//! Synchronization core
//!
//! Pure state machines for the banter chat client. One duplex connection
//! delivers three independently-arriving signal streams (chat messages,
//! typing presence, and read-receipts/roster) and this crate reconciles
//! them, together with local user actions, into a single consistent view
//! model.
//!
//! # Architecture
//!
//! Everything here follows the Sans-IO, action-based pattern: the
//! [`Client`] receives events ([`ClientEvent`]), processes them through
//! pure state machine logic, and returns actions ([`ClientAction`]) for
//! the caller to execute. No sockets, no timers, no tasks; time and
//! randomness come in through the [`Environment`] trait, so every behavior
//! is reproducible in simulation.
//!
//! # Components
//!
//! - [`Client`]: top-level state machine tying the pieces together
//! - [`Session`]: connection lifecycle and state-gated join announcement
//! - [`PresenceTracker`]: typist set, online roster, typing debounce
//! - [`MessageLedger`]: ordered, deduplicated, mutable message log
//! - [`receipts`]: read-receipt aggregation and application
//! - [`ChatView`]: the derived view model handed to rendering surfaces

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod env;
mod event;
mod ledger;
mod presence;
pub mod receipts;
mod session;
mod view;

pub use client::Client;
pub use env::Environment;
pub use event::{ClientAction, ClientEvent};
pub use ledger::{MessageEntry, MessageLedger, MessageStatus};
pub use presence::{PresenceTracker, TYPING_QUIET_INTERVAL};
pub use session::{Session, SessionState};
pub use view::{ChatView, MessageView};
