//! Session lifecycle and join gating.
//!
//! Tracks the transport's reported connection state and owns the
//! announce-once rule: the join event for a connection is claimed through
//! [`Session::take_announce`], which fires exactly once per open
//! connection. There is no timer between "connected" and "join": the
//! announcement is gated purely on state, so it can never race handler
//! registration or fire on a dead connection.

/// Connection lifecycle states, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection.
    Disconnected,
    /// Dial in progress.
    Connecting,
    /// Connection open.
    Connected,
}

/// Session lifecycle state machine.
///
/// Pure bookkeeping: the transport reports transitions, the client asks
/// whether the current connection still owes a join announcement.
#[derive(Debug, Clone)]
pub struct Session {
    /// Last reported transport state.
    state: SessionState,
    /// Whether the join announcement was already claimed for the current
    /// connection.
    announced: bool,
}

impl Session {
    /// Create a session in [`SessionState::Disconnected`].
    pub fn new() -> Self {
        Self { state: SessionState::Disconnected, announced: false }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while the connection is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Record that the transport began dialing.
    pub fn dialing(&mut self) {
        self.state = SessionState::Connecting;
    }

    /// Record that the connection opened.
    ///
    /// A fresh connection gets a fresh announcement slot. A duplicate open
    /// report for an already-open connection does not, so the join can
    /// never double-fire on one connection.
    pub fn opened(&mut self) {
        if self.state != SessionState::Connected {
            self.announced = false;
        }
        self.state = SessionState::Connected;
    }

    /// Record that the connection closed or the dial failed.
    pub fn closed(&mut self) {
        self.state = SessionState::Disconnected;
    }

    /// Claim the join announcement for the current connection.
    ///
    /// Returns `true` exactly once per open connection; `false` while
    /// disconnected or once the announcement is claimed. Callers that hold
    /// an identity emit the join when this returns `true`; callers without
    /// one simply do not ask.
    pub fn take_announce(&mut self) -> bool {
        if self.state == SessionState::Connected && !self.announced {
            self.announced = true;
            true
        } else {
            false
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
