//! User-facing handle to a running sync engine.
//!
//! Frontends never touch the client state machine or the transport
//! directly: they issue [`Command`]s through a [`ChatHandle`] and read the
//! derived [`ChatView`] from the watch channel. Commands issued after the
//! engine shut down are dropped silently, matching the protocol's
//! fire-and-forget posture.

use banter_client::ChatView;
use tokio::sync::{mpsc, watch};

/// Commands a frontend can issue to the engine.
#[derive(Debug, Clone)]
pub enum Command {
    /// Supply the display name, once. Later joins are ignored.
    Join {
        /// Raw display name from the name-entry surface.
        name: String,
    },
    /// The composer content changed.
    SetInput {
        /// Full composer content after the mutation.
        text: String,
    },
    /// Submit the current composer content.
    Send,
    /// Stop the engine and tear down the transport.
    Shutdown,
}

/// Handle to a running [`crate::SyncEngine`].
///
/// Cheap to clone; every clone commands the same engine and observes the
/// same view channel.
#[derive(Clone)]
pub struct ChatHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<ChatView>,
}

impl ChatHandle {
    pub(crate) fn new(commands: mpsc::Sender<Command>, view: watch::Receiver<ChatView>) -> Self {
        Self { commands, view }
    }

    /// Supply the local display name. Honored once per session.
    pub async fn join(&self, name: impl Into<String>) {
        self.command(Command::Join { name: name.into() }).await;
    }

    /// Report the composer content after an input mutation.
    pub async fn set_input(&self, text: impl Into<String>) {
        self.command(Command::SetInput { text: text.into() }).await;
    }

    /// Submit the current composer content as a chat message.
    pub async fn send(&self) {
        self.command(Command::Send).await;
    }

    /// Stop the engine and tear down the transport.
    pub async fn shutdown(&self) {
        self.command(Command::Shutdown).await;
    }

    /// The read-only view channel for the rendering surface. The engine
    /// publishes a fresh [`ChatView`] after every state change.
    #[must_use]
    pub fn view(&self) -> watch::Receiver<ChatView> {
        self.view.clone()
    }

    /// The current view snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ChatView {
        self.view.borrow().clone()
    }

    async fn command(&self, command: Command) {
        if self.commands.send(command).await.is_err() {
            tracing::debug!("engine stopped; command dropped");
        }
    }
}
