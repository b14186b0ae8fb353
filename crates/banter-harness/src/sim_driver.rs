//! Simulated driver implementing the app's Driver trait.
//!
//! [`SimDriver`] stands in for the WebSocket stack: tests inject session
//! events (connection lifecycle, inbound wire events) through the
//! [`SimNetwork`] half and inspect the outbound traffic the engine
//! produced. Nothing here touches a socket or a real clock.

use std::sync::{Arc, Mutex, PoisonError};

use banter_app::{Driver, SessionEvent};
use banter_proto::Event;
use tokio::sync::mpsc;

use crate::sim_env::{SimEnv, SimInstant};

/// Outbound traffic captured from the engine.
#[derive(Default)]
struct Captured {
    sent: Vec<Event>,
}

/// In-memory driver for deterministic engine tests.
pub struct SimDriver {
    env: SimEnv,
    inbox: mpsc::UnboundedReceiver<SessionEvent>,
    captured: Arc<Mutex<Captured>>,
    stopped: bool,
}

/// Test-side handle to the simulated transport.
///
/// Cloneable; injection is ordered per handle and everything lands in the
/// single inbox the driver reads.
#[derive(Clone)]
pub struct SimNetwork {
    inbox: mpsc::UnboundedSender<SessionEvent>,
    captured: Arc<Mutex<Captured>>,
}

impl SimDriver {
    /// Create a driver sharing the given environment's clock, plus the
    /// network handle tests use to script the transport.
    #[must_use]
    pub fn new(env: &SimEnv) -> (Self, SimNetwork) {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let captured = Arc::new(Mutex::new(Captured::default()));

        let driver = Self {
            env: env.clone(),
            inbox: inbox_rx,
            captured: Arc::clone(&captured),
            stopped: false,
        };
        let network = SimNetwork { inbox: inbox_tx, captured };
        (driver, network)
    }
}

impl Driver for SimDriver {
    type Instant = SimInstant;

    async fn send(&mut self, event: Event) {
        lock(&self.captured).sent.push(event);
    }

    async fn recv(&mut self) -> Option<SessionEvent> {
        if self.stopped {
            return None;
        }
        self.inbox.recv().await
    }

    fn now(&self) -> Self::Instant {
        banter_client::Environment::now(&self.env)
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.inbox.close();
    }
}

impl SimNetwork {
    /// Inject a raw session event.
    pub fn inject(&self, event: SessionEvent) {
        // Send only fails once the driver is dropped; events scripted past
        // the end of a test are simply lost
        let _ = self.inbox.send(event);
    }

    /// Report the connection open.
    pub fn open(&self) {
        self.inject(SessionEvent::Opened);
    }

    /// Report the connection lost.
    pub fn close(&self) {
        self.inject(SessionEvent::Closed);
    }

    /// Deliver an inbound wire event from the simulated backend.
    pub fn deliver(&self, event: Event) {
        self.inject(SessionEvent::Inbound(event));
    }

    /// Take everything the engine sent since the last call.
    #[must_use]
    pub fn take_sent(&self) -> Vec<Event> {
        std::mem::take(&mut lock(&self.captured).sent)
    }
}

fn lock(captured: &Arc<Mutex<Captured>>) -> std::sync::MutexGuard<'_, Captured> {
    captured.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use banter_proto::Identity;

    use super::*;

    #[tokio::test]
    async fn injected_events_arrive_in_order() {
        let env = SimEnv::new(1);
        let (mut driver, network) = SimDriver::new(&env);

        network.open();
        network.deliver(Event::RoomNotice("hello".to_owned()));
        network.close();

        assert_eq!(driver.recv().await, Some(SessionEvent::Opened));
        assert!(matches!(driver.recv().await, Some(SessionEvent::Inbound(_))));
        assert_eq!(driver.recv().await, Some(SessionEvent::Closed));
    }

    #[tokio::test]
    async fn sent_traffic_is_captured() {
        let env = SimEnv::new(1);
        let (mut driver, network) = SimDriver::new(&env);

        driver.send(Event::TypingStart(Identity::parse("alice").unwrap())).await;

        let sent = network.take_sent();
        assert_eq!(sent.len(), 1);
        assert!(network.take_sent().is_empty());
    }

    #[tokio::test]
    async fn stop_ends_the_inbox() {
        let env = SimEnv::new(1);
        let (mut driver, network) = SimDriver::new(&env);
        network.open();

        driver.stop();

        assert_eq!(driver.recv().await, None);
    }
}
