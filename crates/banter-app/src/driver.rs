//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] trait decouples the engine loop from the concrete
//! transport. [`crate::WsDriver`] provides the production WebSocket
//! implementation; the test harness provides an in-memory one, so the same
//! [`crate::SyncEngine`] orchestration code runs in both.

use std::{future::Future, ops::Sub, time::Duration};

use banter_proto::Event;

use crate::transport::SessionEvent;

/// Abstracts transport I/O for the sync engine.
///
/// # Associated Types
///
/// - [`Instant`](Driver::Instant): time representation (real or virtual),
///   matched to the client environment's instant so simulated clocks drive
///   the debounce exactly like the real one
pub trait Driver: Send {
    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Emit an event on the transport, fire-and-forget.
    ///
    /// Infallible by contract: traffic that cannot be delivered is
    /// dropped, never surfaced as an error.
    fn send(&mut self, event: Event) -> impl Future<Output = ()> + Send;

    /// Next session event, or `None` once the transport is gone for good.
    fn recv(&mut self) -> impl Future<Output = Option<SessionEvent>> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Stop the transport and release its resources. Idempotent.
    fn stop(&mut self);
}
