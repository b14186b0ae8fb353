//! End-to-end scenarios against the client state machine.
//!
//! Each test drives a `Client` with the simulated environment and asserts
//! on the actions it emits and the view it derives, covering the roster,
//! read-receipt, and reconnect flows as a backend would exercise them.

use std::time::Duration;

use banter_client::{
    Client, ClientAction, ClientEvent, Environment, MessageStatus, SessionState,
    TYPING_QUIET_INTERVAL,
};
use banter_harness::SimEnv;
use banter_proto::{Event, Identity, MessageId, Sender, WireMessage};

fn identity(name: &str) -> Identity {
    Identity::parse(name).expect("non-empty name")
}

fn remote_message(id: MessageId, sender: &str, text: &str) -> Event {
    Event::ChatMessage(WireMessage {
        id,
        sender: Sender::from(identity(sender)),
        text: text.to_owned(),
        ts: 1_700_000_000_000,
    })
}

fn sent_events(actions: &[ClientAction]) -> Vec<Event> {
    actions
        .iter()
        .filter_map(|action| match action {
            ClientAction::Send(event) => Some(event.clone()),
            ClientAction::ViewChanged => None,
        })
        .collect()
}

fn connected_client(env: &SimEnv, name: &str) -> Client<SimEnv> {
    let mut client = Client::new(env.clone());
    let _ = client.handle(ClientEvent::Connecting);
    let _ = client.handle(ClientEvent::Connected);
    let _ = client.handle(ClientEvent::Join { name: name.to_owned() });
    client
}

#[test]
fn roster_is_replaced_wholesale_and_messages_are_acknowledged() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    // Alice alone
    let _ = client.handle(ClientEvent::Received(Event::OnlineRoster(vec![identity("alice")])));
    assert_eq!(client.view().roster, [identity("alice")]);

    // Bob joins: full replacement, not a merge
    let _ = client.handle(ClientEvent::Received(Event::OnlineRoster(vec![
        identity("alice"),
        identity("bob"),
    ])));
    assert_eq!(client.view().roster, [identity("alice"), identity("bob")]);

    // Bob's message lands, and one batched mark-read goes out
    let actions = client.handle(ClientEvent::Received(remote_message(1, "bob", "hi")));
    assert_eq!(sent_events(&actions), [Event::MarkRead(vec![1])]);

    let view = client.view();
    assert_eq!(view.messages.len(), 1);
    assert!(!view.messages[0].mine);

    // Already flagged seen: re-processing the ledger finds nothing unread
    let actions = client.handle(ClientEvent::Received(Event::OnlineRoster(vec![identity(
        "alice",
    )])));
    assert!(sent_events(&actions).is_empty());
}

#[test]
fn local_send_is_optimistically_delivered_then_read() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    let _ = client.handle(ClientEvent::InputChanged { text: "hello".to_owned() });
    let actions = client.handle(ClientEvent::SendMessage);

    let sent = sent_events(&actions);
    let Event::ChatMessage(wire) = &sent[0] else {
        panic!("first emission should be the chat message, got {sent:?}");
    };

    // Delivered immediately, no server ack involved
    let view = client.view();
    assert_eq!(view.messages[0].status, MessageStatus::Delivered);
    assert!(view.messages[0].mine);

    // The backend reports the message read
    let _ = client.handle(ClientEvent::Received(Event::MessagesRead(vec![wire.id])));
    assert_eq!(client.view().messages[0].status, MessageStatus::Read);

    // Redelivered batch changes nothing
    let actions = client.handle(ClientEvent::Received(Event::MessagesRead(vec![wire.id])));
    assert!(actions.is_empty());
    assert_eq!(client.view().messages[0].status, MessageStatus::Read);
}

#[test]
fn messages_read_never_touches_other_senders() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    let _ = client.handle(ClientEvent::Received(remote_message(5, "bob", "hi")));
    let _ = client.handle(ClientEvent::Received(Event::MessagesRead(vec![5])));

    assert_eq!(client.view().messages[0].status, MessageStatus::Delivered);
}

#[test]
fn room_notice_becomes_a_system_entry_without_acknowledgment() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    let actions =
        client.handle(ClientEvent::Received(Event::RoomNotice("bob joined".to_owned())));

    assert!(sent_events(&actions).is_empty());
    let view = client.view();
    assert!(view.messages[0].sender.is_system());
    assert!(!view.messages[0].mine);
}

#[test]
fn messages_arriving_before_join_are_acknowledged_at_join() {
    let env = SimEnv::new(7);
    let mut client = Client::new(env);
    let _ = client.handle(ClientEvent::Connected);

    // Traffic lands before the name-entry surface supplies an identity
    let actions = client.handle(ClientEvent::Received(remote_message(9, "bob", "early")));
    assert!(sent_events(&actions).is_empty());

    // Join classifies the backlog and acknowledges it in one batch
    let actions = client.handle(ClientEvent::Join { name: "alice".to_owned() });
    let sent = sent_events(&actions);
    assert_eq!(sent, [Event::Join(identity("alice")), Event::MarkRead(vec![9])]);
}

#[test]
fn join_while_disconnected_is_flushed_once_on_connect() {
    let env = SimEnv::new(7);
    let mut client = Client::new(env);

    let actions = client.handle(ClientEvent::Join { name: "alice".to_owned() });
    assert!(sent_events(&actions).is_empty());
    assert_eq!(client.session_state(), SessionState::Disconnected);

    let actions = client.handle(ClientEvent::Connected);
    assert_eq!(sent_events(&actions), [Event::Join(identity("alice"))]);

    // Duplicate open report for the same connection does not re-announce
    let actions = client.handle(ClientEvent::Connected);
    assert!(sent_events(&actions).is_empty());
}

#[test]
fn reconnect_reannounces_and_preserves_the_ledger() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");
    let _ = client.handle(ClientEvent::Received(remote_message(1, "bob", "hi")));

    let _ = client.handle(ClientEvent::Disconnected);
    assert_eq!(client.session_state(), SessionState::Disconnected);

    let actions = client.handle(ClientEvent::Connected);
    assert_eq!(sent_events(&actions), [Event::Join(identity("alice"))]);

    // State survives the drop; nothing is re-acknowledged
    assert_eq!(client.view().messages.len(), 1);
}

#[test]
fn typing_signals_follow_the_composer() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    let actions = client.handle(ClientEvent::InputChanged { text: "h".to_owned() });
    assert_eq!(sent_events(&actions), [Event::TypingStart(identity("alice"))]);

    // Clearing the composer stops immediately, no debounce wait
    let actions = client.handle(ClientEvent::InputChanged { text: String::new() });
    assert_eq!(sent_events(&actions), [Event::TypingStop(identity("alice"))]);

    // And the disarmed timer never fires later
    let now = Environment::now(&env);
    let actions = client.handle(ClientEvent::Tick { now: now + TYPING_QUIET_INTERVAL * 2 });
    assert!(actions.is_empty());
}

#[test]
fn whitespace_only_composer_counts_as_not_typing() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    let actions = client.handle(ClientEvent::InputChanged { text: "hi".to_owned() });
    assert_eq!(sent_events(&actions), [Event::TypingStart(identity("alice"))]);

    // Spaces-only content is treated like an empty composer: stop now,
    // not after the quiet interval
    let actions = client.handle(ClientEvent::InputChanged { text: "   ".to_owned() });
    assert_eq!(sent_events(&actions), [Event::TypingStop(identity("alice"))]);

    // The quiet timer was disarmed, so no second stop follows
    let now = Environment::now(&env);
    let actions = client.handle(ClientEvent::Tick { now: now + TYPING_QUIET_INTERVAL * 2 });
    assert!(actions.is_empty());
}

#[test]
fn debounce_emits_one_stop_after_the_quiet_interval() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    // Rapid keystrokes, each within the quiet interval of the last
    for (i, text) in ["h", "he", "hel", "hell", "hello"].iter().enumerate() {
        if i > 0 {
            env.advance(Duration::from_millis(200));
        }
        let actions = client.handle(ClientEvent::InputChanged { text: (*text).to_owned() });
        assert_eq!(sent_events(&actions), [Event::TypingStart(identity("alice"))]);

        // No stop while typing continues
        let actions = client.handle(ClientEvent::Tick { now: Environment::now(&env) });
        assert!(actions.is_empty());
    }

    // Quiet period elapses: exactly one stop
    env.advance(TYPING_QUIET_INTERVAL);
    let actions = client.handle(ClientEvent::Tick { now: Environment::now(&env) });
    assert_eq!(sent_events(&actions), [Event::TypingStop(identity("alice"))]);

    // Further ticks stay silent
    env.advance(TYPING_QUIET_INTERVAL);
    let actions = client.handle(ClientEvent::Tick { now: Environment::now(&env) });
    assert!(actions.is_empty());
}

#[test]
fn no_typing_traffic_before_an_identity_exists() {
    let env = SimEnv::new(7);
    let mut client = Client::new(env);
    let _ = client.handle(ClientEvent::Connected);

    let actions = client.handle(ClientEvent::InputChanged { text: "hello".to_owned() });
    assert!(sent_events(&actions).is_empty());

    let actions = client.handle(ClientEvent::SendMessage);
    assert!(actions.is_empty());
}

#[test]
fn remote_typing_presence_is_idempotent_per_identity() {
    let env = SimEnv::new(7);
    let mut client = connected_client(&env, "alice");

    let _ = client.handle(ClientEvent::Received(Event::TypingStart(identity("bob"))));
    let _ = client.handle(ClientEvent::Received(Event::TypingStart(identity("bob"))));
    let _ = client.handle(ClientEvent::Received(Event::TypingStart(identity("carol"))));

    assert_eq!(client.view().typists, [identity("bob"), identity("carol")]);

    // Stop for an absent name is a no-op
    let actions = client.handle(ClientEvent::Received(Event::TypingStop(identity("dave"))));
    assert!(actions.is_empty());

    let _ = client.handle(ClientEvent::Received(Event::TypingStop(identity("bob"))));
    assert_eq!(client.view().typists, [identity("carol")]);
}
