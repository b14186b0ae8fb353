//! Production driver over a WebSocket [`Session`].

use banter_proto::Event;

use crate::{
    driver::Driver,
    error::TransportError,
    transport::{Backoff, Session, SessionEvent},
};

/// [`Driver`] implementation backed by the real WebSocket session.
pub struct WsDriver {
    session: Session,
}

impl WsDriver {
    /// Wrap an already-established session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Establish a session to `endpoint` and wrap it.
    ///
    /// # Errors
    ///
    /// - `TransportError::InvalidEndpoint` if the endpoint is malformed
    pub fn connect(endpoint: &str, backoff: Backoff) -> Result<Self, TransportError> {
        Ok(Self::new(Session::connect(endpoint, backoff)?))
    }
}

impl Driver for WsDriver {
    type Instant = std::time::Instant;

    async fn send(&mut self, event: Event) {
        self.session.send(event);
    }

    async fn recv(&mut self) -> Option<SessionEvent> {
        self.session.recv().await
    }

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn stop(&mut self) {
        self.session.teardown();
    }
}
