//! Client state machine.
//!
//! The `Client` is the top-level synchronization state machine. It owns
//! the session lifecycle, the presence tracker, the message ledger, and
//! the composer draft, and reconciles the three inbound signal streams
//! (chat messages, typing presence, read-receipts/roster) with local user
//! actions into one consistent view.
//!
//! This is a pure state machine in the action pattern: [`Client::handle`]
//! consumes a [`ClientEvent`], mutates state, and returns [`ClientAction`]s
//! for the caller to execute. It is infallible by design: invalid local
//! input and anomalous inbound traffic both degrade to "state does not
//! update", never to an error or a panic.

use banter_proto::{Event, Identity, MessageId, compose_message_id};

use crate::{
    env::Environment,
    event::{ClientAction, ClientEvent},
    ledger::MessageLedger,
    presence::PresenceTracker,
    receipts,
    session::{Session, SessionState},
    view::ChatView,
};

/// Top-level synchronization state machine.
///
/// No I/O dependencies, fully testable in simulation.
pub struct Client<E: Environment> {
    /// Environment for time and randomness.
    env: E,
    /// Connection lifecycle and join gating.
    session: Session,
    /// Local display name. Set once via the join action.
    identity: Option<Identity>,
    /// Typing presence and the online roster.
    presence: PresenceTracker<E::Instant>,
    /// Ordered message log.
    ledger: MessageLedger,
    /// Composer content.
    draft: String,
}

impl<E: Environment> Client<E> {
    /// Create a client with no identity and no connection.
    pub fn new(env: E) -> Self {
        Self {
            env,
            session: Session::new(),
            identity: None,
            presence: PresenceTracker::new(),
            ledger: MessageLedger::new(),
            draft: String::new(),
        }
    }

    /// The local display name. `None` until the join action supplies one.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Current session lifecycle state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Derive a fresh view model snapshot from the current state.
    #[must_use]
    pub fn view(&self) -> ChatView {
        ChatView::derive(
            self.session.state(),
            self.identity.as_ref(),
            &self.ledger,
            self.presence.typists(),
            self.presence.roster(),
            &self.draft,
        )
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: ClientEvent<E::Instant>) -> Vec<ClientAction> {
        match event {
            ClientEvent::Connecting => {
                self.session.dialing();
                vec![ClientAction::ViewChanged]
            },
            ClientEvent::Connected => self.handle_connected(),
            ClientEvent::Disconnected => {
                self.session.closed();
                vec![ClientAction::ViewChanged]
            },
            ClientEvent::Received(event) => self.handle_inbound(event),
            ClientEvent::Join { name } => self.handle_join(&name),
            ClientEvent::InputChanged { text } => self.handle_input_changed(text),
            ClientEvent::SendMessage => self.handle_send_message(),
            ClientEvent::Tick { now } => self.handle_tick(now),
        }
    }

    /// Connection open: flush the join announcement if an identity is
    /// waiting and this connection has not announced yet. A reconnect
    /// re-announces so the backend re-learns roster membership.
    fn handle_connected(&mut self) -> Vec<ClientAction> {
        self.session.opened();

        let mut actions = Vec::new();
        if let Some(identity) = self.identity.clone()
            && self.session.take_announce()
        {
            actions.push(ClientAction::Send(Event::Join(identity)));
        }
        actions.push(ClientAction::ViewChanged);
        actions
    }

    /// The one-time join action: validate the name, store it, announce it
    /// if the connection is already open.
    fn handle_join(&mut self, name: &str) -> Vec<ClientAction> {
        if self.identity.is_some() {
            return vec![];
        }
        let Some(identity) = Identity::parse(name) else {
            return vec![];
        };
        self.identity = Some(identity.clone());

        let mut actions = Vec::new();
        if self.session.take_announce() {
            actions.push(ClientAction::Send(Event::Join(identity)));
        }
        // Messages that arrived before the name was chosen become
        // classifiable now; acknowledge them in one batch.
        if let Some(action) = self.acknowledge() {
            actions.push(action);
        }
        actions.push(ClientAction::ViewChanged);
        actions
    }

    fn handle_inbound(&mut self, event: Event) -> Vec<ClientAction> {
        match event {
            Event::RoomNotice(text) => {
                let id = self.fresh_id();
                self.ledger.append_system(id, text, self.env.unix_millis());
                self.after_ledger_change()
            },
            Event::OnlineRoster(names) => {
                self.presence.replace_roster(names);
                vec![ClientAction::ViewChanged]
            },
            Event::ChatMessage(message) => {
                self.ledger.append_remote(message);
                self.after_ledger_change()
            },
            Event::TypingStart(who) => {
                if self.presence.typing_started(who) {
                    vec![ClientAction::ViewChanged]
                } else {
                    vec![]
                }
            },
            Event::TypingStop(who) => {
                if self.presence.typing_stopped(&who) {
                    vec![ClientAction::ViewChanged]
                } else {
                    vec![]
                }
            },
            Event::MessagesRead(ids) => {
                let Some(me) = self.identity.clone() else {
                    return vec![];
                };
                if receipts::apply_read(&mut self.ledger, &me, &ids) > 0 {
                    vec![ClientAction::ViewChanged]
                } else {
                    vec![]
                }
            },
            // These kinds only travel client → server; a peer sending them
            // anyway is tolerated by dropping the frame.
            Event::Join(_) | Event::MarkRead(_) => vec![],
        }
    }

    /// Composer mutation: content that survives trimming signals typing
    /// and (re)arms the quiet timer; clearing to blank signals stop
    /// immediately, no debounce wait. No typing traffic flows before the
    /// identity is set.
    fn handle_input_changed(&mut self, text: String) -> Vec<ClientAction> {
        let mut actions = Vec::new();

        if let Some(identity) = self.identity.clone() {
            if text.trim().is_empty() {
                self.presence.cancel_quiet();
                actions.push(ClientAction::Send(Event::TypingStop(identity)));
            } else {
                self.presence.keystroke(self.env.now());
                actions.push(ClientAction::Send(Event::TypingStart(identity)));
            }
        }

        self.draft = text;
        actions.push(ClientAction::ViewChanged);
        actions
    }

    /// Submit the composer content: optimistic local append, transmission,
    /// draft cleared. The cleared composer also means "not typing", so the
    /// stop signal goes out immediately and the quiet timer disarms.
    fn handle_send_message(&mut self) -> Vec<ClientAction> {
        let Some(identity) = self.identity.clone() else {
            return vec![];
        };

        let ts = self.env.unix_millis();
        let id = compose_message_id(ts, self.env.random_u64());
        let Some(message) = self.ledger.append_local(id, identity.clone(), &self.draft, ts)
        else {
            // Whitespace-only draft: nothing appended, nothing sent, draft
            // left for the user to edit.
            return vec![];
        };

        self.draft.clear();
        self.presence.cancel_quiet();

        let mut actions = vec![
            ClientAction::Send(Event::ChatMessage(message)),
            ClientAction::Send(Event::TypingStop(identity)),
        ];
        if let Some(action) = self.acknowledge() {
            actions.push(action);
        }
        actions.push(ClientAction::ViewChanged);
        actions
    }

    /// Periodic housekeeping: fire the debounced typing-stop when a full
    /// quiet interval has passed since the last keystroke.
    fn handle_tick(&mut self, now: E::Instant) -> Vec<ClientAction> {
        if self.presence.quiet_elapsed(now)
            && let Some(identity) = self.identity.clone()
        {
            return vec![ClientAction::Send(Event::TypingStop(identity))];
        }
        vec![]
    }

    /// Run the acknowledge pass and report the view change. Called after
    /// every ledger mutation.
    fn after_ledger_change(&mut self) -> Vec<ClientAction> {
        let mut actions = Vec::new();
        if let Some(action) = self.acknowledge() {
            actions.push(action);
        }
        actions.push(ClientAction::ViewChanged);
        actions
    }

    /// One batched read acknowledgment for everything newly seen, if
    /// anything is. "Mine" is undefined without an identity, so the pass
    /// waits for the join action.
    fn acknowledge(&mut self) -> Option<ClientAction> {
        let me = self.identity.as_ref()?;
        receipts::acknowledge(&mut self.ledger, me)
            .map(|ids| ClientAction::Send(Event::MarkRead(ids)))
    }

    /// Compose a fresh message id from the wall clock and a random suffix.
    fn fresh_id(&self) -> MessageId {
        compose_message_id(self.env.unix_millis(), self.env.random_u64())
    }
}
