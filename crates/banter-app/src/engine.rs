//! The sync engine event loop.
//!
//! [`SyncEngine`] wires the transport to the pure client state machine:
//! one task, one `select!` over the command channel, the driver's session
//! events, and a periodic tick. Every branch feeds exactly one
//! [`ClientEvent`] into the client and then executes the returned actions
//! in order, so handlers run to completion and no two run concurrently.
//!
//! View publication goes through a `watch` channel: the rendering surface
//! holds the receiving end and only ever reads.

use std::time::Duration;

use banter_client::{Client, ClientAction, ClientEvent, Environment};
use tokio::sync::{mpsc, watch};

use crate::{
    driver::Driver,
    error::EngineError,
    handle::{ChatHandle, Command},
    system_env::SystemEnv,
    transport::{Backoff, SessionEvent},
    ws::WsDriver,
};

/// Command channel depth.
const COMMAND_BUFFER: usize = 64;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// WebSocket endpoint of the chat backend.
    pub endpoint: String,
    /// How often the housekeeping tick fires. Bounds how late the typing
    /// quiet deadline can be observed.
    pub tick_interval: Duration,
    /// Reconnect backoff bounds for the transport.
    pub backoff: Backoff,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:3000".to_owned(),
            tick_interval: Duration::from_millis(100),
            backoff: Backoff::default(),
        }
    }
}

/// The orchestration loop tying driver, client, and view channel together.
///
/// Generic over the driver and environment so the same loop runs over the
/// real socket with the real clock and over the simulated driver with a
/// manual clock. The two instant types are unified, which is what lets a
/// virtual clock drive the debounce deadline.
pub struct SyncEngine<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    client: Client<E>,
    commands: mpsc::Receiver<Command>,
    view: watch::Sender<banter_client::ChatView>,
    tick_interval: Duration,
}

impl<D, E> SyncEngine<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create an engine over the given driver and environment.
    ///
    /// Returns the engine (to be spawned via [`SyncEngine::run`]) and the
    /// handle frontends use to command it.
    pub fn new(driver: D, env: E, tick_interval: Duration) -> (Self, ChatHandle) {
        let client = Client::new(env);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view_rx) = watch::channel(client.view());

        let engine = Self { driver, client, commands: command_rx, view: view_tx, tick_interval };
        (engine, ChatHandle::new(command_tx, view_rx))
    }

    /// Run the event loop until shutdown.
    ///
    /// The loop exits on a [`Command::Shutdown`], when every handle is
    /// dropped, or when the driver reports the transport permanently gone.
    /// On exit the session is marked disconnected, a final view is
    /// published, and the driver is stopped; the stored debounce deadline
    /// dies with the engine, so no timer can fire afterwards.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe_command = self.commands.recv() => {
                    match maybe_command {
                        Some(Command::Shutdown) | None => break,
                        Some(Command::Join { name }) => {
                            self.dispatch(ClientEvent::Join { name }).await;
                        },
                        Some(Command::SetInput { text }) => {
                            self.dispatch(ClientEvent::InputChanged { text }).await;
                        },
                        Some(Command::Send) => {
                            self.dispatch(ClientEvent::SendMessage).await;
                        },
                    }
                },

                maybe_event = self.driver.recv() => {
                    match maybe_event {
                        Some(event) => {
                            let event = Self::session_to_client(event);
                            self.dispatch(event).await;
                        },
                        None => {
                            tracing::debug!("transport gone, stopping engine");
                            break;
                        },
                    }
                },

                _ = ticker.tick() => {
                    self.dispatch(ClientEvent::Tick { now: self.driver.now() }).await;
                },
            }
        }

        self.dispatch(ClientEvent::Disconnected).await;
        self.driver.stop();
    }

    /// Feed one event into the client and execute the resulting actions.
    async fn dispatch(&mut self, event: ClientEvent<E::Instant>) {
        for action in self.client.handle(event) {
            match action {
                ClientAction::Send(event) => self.driver.send(event).await,
                ClientAction::ViewChanged => {
                    self.view.send_replace(self.client.view());
                },
            }
        }
    }

    fn session_to_client(event: SessionEvent) -> ClientEvent<E::Instant> {
        match event {
            SessionEvent::Connecting => ClientEvent::Connecting,
            SessionEvent::Opened => ClientEvent::Connected,
            SessionEvent::Closed => ClientEvent::Disconnected,
            SessionEvent::Inbound(event) => ClientEvent::Received(event),
        }
    }
}

impl SyncEngine<WsDriver, SystemEnv> {
    /// Convenience constructor for the production stack: WebSocket driver,
    /// system environment.
    ///
    /// # Errors
    ///
    /// - `EngineError::Transport` if the configured endpoint is malformed
    pub fn over_websocket(config: &EngineConfig) -> Result<(Self, ChatHandle), EngineError> {
        let driver = WsDriver::connect(&config.endpoint, config.backoff)?;
        Ok(Self::new(driver, SystemEnv::new(), config.tick_interval))
    }
}
