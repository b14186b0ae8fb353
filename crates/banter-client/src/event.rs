//! Client input events and output actions.
//!
//! [`ClientEvent`] is the complete set of inputs that drive the [`crate::Client`]
//! state machine. Inputs come from three sources: transport lifecycle
//! reports, decoded inbound wire events, and the user-facing surfaces
//! (name entry, composer). [`ClientAction`] is everything the state machine
//! can ask its caller to do.

use banter_proto::Event;

/// Events processed by the client state machine.
///
/// Generic over the instant type so simulated clocks drive ticks in tests
/// exactly like the real clock does in production.
#[derive(Debug, Clone)]
pub enum ClientEvent<I = std::time::Instant> {
    /// The transport began dialing.
    Connecting,

    /// The transport reported the connection open.
    Connected,

    /// The transport reported the connection lost or closed.
    Disconnected,

    /// One decoded inbound wire event.
    Received(Event),

    /// The name-entry surface supplied a display name. Honored once;
    /// later joins are ignored.
    Join {
        /// Raw display name, validated and trimmed by the client.
        name: String,
    },

    /// The composer content changed.
    InputChanged {
        /// Full composer content after the mutation.
        text: String,
    },

    /// Submit the current composer content as a chat message.
    SendMessage,

    /// Periodic housekeeping: checks the typing quiet deadline.
    Tick {
        /// Current monotonic time.
        now: I,
    },
}

/// Actions produced by the client state machine.
///
/// The caller (runtime loop or test harness) executes these in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Emit this event on the transport, fire-and-forget.
    Send(Event),

    /// The derived view model changed; callers republish
    /// [`crate::Client::view`].
    ViewChanged,
}
