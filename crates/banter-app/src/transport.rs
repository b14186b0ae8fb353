//! WebSocket transport session.
//!
//! [`Session`] owns the single realtime connection. A spawned connection
//! task converts the socket into two channels: outbound [`Event`]s
//! (fire-and-forget, dropped silently once the connection is gone) and
//! inbound [`SessionEvent`]s. The task owns reconnection: on dial failure
//! or connection loss it backs off exponentially and redials until the
//! session is torn down.
//!
//! Inbound frames that fail to decode are logged and dropped: a peer
//! speaking a newer protocol revision must never take the client down.

use std::time::Duration;

use banter_proto::Event;
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};

use crate::error::TransportError;

/// Reconnect backoff bounds for the connection task.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    /// Delay before the first redial attempt.
    pub initial: Duration,
    /// Upper bound the doubling delay saturates at.
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { initial: Duration::from_millis(250), max: Duration::from_secs(8) }
    }
}

/// What the connection task reports up to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A dial attempt started.
    Connecting,
    /// The connection is open.
    Opened,
    /// The connection was lost or closed; a redial follows.
    Closed,
    /// One decoded inbound wire event.
    Inbound(Event),
}

/// Why the socket loop ended.
enum SocketExit {
    /// The `Session` handle was dropped or torn down; stop redialing.
    SessionGone,
    /// The connection died; redial after backoff.
    ConnectionLost,
}

/// Outbound channel depth. A full buffer means the connection task is
/// stalled; further sends are dropped, which matches the fire-and-forget
/// contract.
const OUTBOUND_BUFFER: usize = 64;

/// Inbound channel depth.
const INBOUND_BUFFER: usize = 256;

/// Handle to the single realtime connection.
///
/// Dropping the session tears it down. [`Session::teardown`] is idempotent
/// and safe to call on a session that never managed to connect; after it
/// returns, no late emission can reach the wire.
pub struct Session {
    outbound: mpsc::Sender<Event>,
    events: mpsc::Receiver<SessionEvent>,
    abort: tokio::task::AbortHandle,
    torn_down: bool,
}

impl Session {
    /// Establish the session: validate the endpoint and spawn the
    /// connection task. The task dials immediately and keeps redialing
    /// with backoff for the life of the session.
    ///
    /// # Errors
    ///
    /// - `TransportError::InvalidEndpoint` if the endpoint is not a valid
    ///   WebSocket URL. Unreachable-but-valid endpoints are not an error;
    ///   the task retries those forever.
    pub fn connect(endpoint: &str, backoff: Backoff) -> Result<Self, TransportError> {
        endpoint
            .into_client_request()
            .map_err(|e| TransportError::InvalidEndpoint(e.to_string()))?;

        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (events_tx, events_rx) = mpsc::channel(INBOUND_BUFFER);

        let task = tokio::spawn(run_connection(
            endpoint.to_owned(),
            backoff,
            outbound_rx,
            events_tx,
        ));

        Ok(Self {
            outbound: outbound_tx,
            events: events_rx,
            abort: task.abort_handle(),
            torn_down: false,
        })
    }

    /// Emit an event, fire-and-forget.
    ///
    /// No acknowledgment, no retry. If the connection is down or the task
    /// is stalled the event is dropped; lost traffic is the documented
    /// behavior, not an error.
    pub fn send(&self, event: Event) {
        if let Err(error) = self.outbound.try_send(event) {
            tracing::debug!(%error, "outbound event dropped");
        }
    }

    /// Next session event. `None` once the session is torn down.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        if self.torn_down {
            return None;
        }
        self.events.recv().await
    }

    /// Tear the session down: abort the connection task and close the
    /// channels. Idempotent, and safe on a session that never connected.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.abort.abort();
        self.events.close();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Connection task: dial, drive the socket, redial with backoff.
async fn run_connection(
    endpoint: String,
    backoff: Backoff,
    mut outbound: mpsc::Receiver<Event>,
    events: mpsc::Sender<SessionEvent>,
) {
    let mut delay = backoff.initial;

    loop {
        if events.send(SessionEvent::Connecting).await.is_err() {
            return;
        }

        match connect_async(endpoint.as_str()).await {
            Ok((socket, _response)) => {
                delay = backoff.initial;
                if events.send(SessionEvent::Opened).await.is_err() {
                    return;
                }
                let exit = drive_socket(socket, &mut outbound, &events).await;
                if events.send(SessionEvent::Closed).await.is_err() {
                    return;
                }
                if matches!(exit, SocketExit::SessionGone) {
                    return;
                }
                tracing::debug!(endpoint, "connection lost, redialing");
            },
            Err(error) => {
                tracing::debug!(endpoint, %error, "dial failed");
            },
        }

        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(backoff.max);
    }
}

/// Pump one open socket until it dies or the session goes away.
async fn drive_socket(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    outbound: &mut mpsc::Receiver<Event>,
    events: &mpsc::Sender<SessionEvent>,
) -> SocketExit {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            maybe_event = outbound.recv() => {
                let Some(event) = maybe_event else {
                    return SocketExit::SessionGone;
                };
                match event.encode() {
                    Ok(frame) => {
                        if sink.send(Message::text(frame)).await.is_err() {
                            return SocketExit::ConnectionLost;
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, "dropping unencodable event");
                    },
                }
            },

            maybe_frame = stream.next() => {
                match maybe_frame {
                    Some(Ok(Message::Text(text))) => match Event::decode(text.as_str()) {
                        Ok(event) => {
                            if events.send(SessionEvent::Inbound(event)).await.is_err() {
                                return SocketExit::SessionGone;
                            }
                        },
                        Err(error) => {
                            tracing::warn!(%error, "dropping undecodable frame");
                        },
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        return SocketExit::ConnectionLost;
                    },
                    // Control and binary frames carry nothing for this
                    // protocol; tungstenite answers pings itself.
                    Some(Ok(
                        Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_),
                    )) => {},
                    Some(Err(error)) => {
                        tracing::debug!(%error, "socket error");
                        return SocketExit::ConnectionLost;
                    },
                }
            },
        }
    }
}
