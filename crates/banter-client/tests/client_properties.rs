//! Property-based tests for the synchronization state machine.
//!
//! Verifies the idempotence and exclusion invariants over arbitrary event
//! sequences rather than fixed scenarios: the typist set is a set, read
//! signals are safe to redeliver, and the unread computation never picks
//! up system or local entries.

use banter_client::{Client, ClientEvent, Environment, MessageStatus};
use banter_harness::SimEnv;
use banter_proto::{Event, Identity, Sender, WireMessage};
use proptest::prelude::*;

fn arbitrary_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("local identity is reserved", |name| name != "me")
}

fn arbitrary_typing_event() -> impl Strategy<Value = Event> {
    (arbitrary_name(), any::<bool>()).prop_map(|(name, start)| {
        let who = Identity::parse(&name).expect("non-empty name");
        if start { Event::TypingStart(who) } else { Event::TypingStop(who) }
    })
}

fn joined_client(seed: u64) -> Client<SimEnv> {
    let mut client = Client::new(SimEnv::new(seed));
    let _ = client.handle(ClientEvent::Connected);
    let _ = client.handle(ClientEvent::Join { name: "me".to_owned() });
    client
}

#[test]
fn prop_typist_set_holds_each_identity_at_most_once() {
    proptest!(|(events in prop::collection::vec(arbitrary_typing_event(), 0..64))| {
        let mut client = joined_client(1);

        for event in events {
            let _ = client.handle(ClientEvent::Received(event));
        }

        let typists = client.view().typists;
        let mut deduped = typists.clone();
        deduped.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        deduped.dedup();

        // PROPERTY: set semantics - no identity appears twice
        prop_assert_eq!(typists.len(), deduped.len());
    });
}

#[test]
fn prop_redelivered_read_batches_are_idempotent() {
    proptest!(|(texts in prop::collection::vec("[a-z]{1,12}", 1..8), redeliveries in 1usize..4)| {
        let mut client = joined_client(2);

        let mut ids = Vec::new();
        for text in &texts {
            let _ = client.handle(ClientEvent::InputChanged { text: text.clone() });
            let _ = client.handle(ClientEvent::SendMessage);
        }
        for message in client.view().messages {
            ids.push(message.id);
        }

        let _ = client.handle(ClientEvent::Received(Event::MessagesRead(ids.clone())));
        let after_first = client.view();

        for _ in 0..redeliveries {
            let _ = client.handle(ClientEvent::Received(Event::MessagesRead(ids.clone())));
        }

        // PROPERTY: re-delivery leaves the view untouched
        prop_assert_eq!(client.view(), after_first);

        for message in client.view().messages {
            prop_assert_eq!(message.status, MessageStatus::Read);
        }
    });
}

#[test]
fn prop_unread_never_includes_system_or_local_entries() {
    proptest!(|(
        remote_count in 0usize..8,
        notice_count in 0usize..4,
        local_texts in prop::collection::vec("[a-z]{1,8}", 0..4),
    )| {
        let env = SimEnv::new(3);
        let mut client = Client::new(env.clone());
        let _ = client.handle(ClientEvent::Connected);

        // Backlog arrives before the identity exists, so nothing is
        // acknowledged along the way
        for i in 0..remote_count {
            let _ = client.handle(ClientEvent::Received(Event::ChatMessage(WireMessage {
                id: 1_000 + i as u64,
                sender: Sender::from(Identity::parse("peer").expect("non-empty")),
                text: format!("m{i}"),
                ts: env.unix_millis(),
            })));
        }
        for i in 0..notice_count {
            let _ = client.handle(ClientEvent::Received(Event::RoomNotice(format!("n{i}"))));
        }

        let mut mark_read_batches = Vec::new();
        for action in client.handle(ClientEvent::Join { name: "me".to_owned() }) {
            if let banter_client::ClientAction::Send(Event::MarkRead(ids)) = action {
                mark_read_batches.push(ids);
            }
        }

        for text in &local_texts {
            let _ = client.handle(ClientEvent::InputChanged { text: text.clone() });
            let _ = client.handle(ClientEvent::SendMessage);
        }

        // PROPERTY: at most one batch, containing exactly the remote ids
        prop_assert!(mark_read_batches.len() <= 1);
        let acknowledged: usize = mark_read_batches.iter().map(Vec::len).sum();
        prop_assert_eq!(acknowledged, remote_count);
    });
}

#[test]
fn prop_ledger_order_is_arrival_order() {
    proptest!(|(ids in prop::collection::vec(1u64..1_000, 1..16))| {
        let mut client = joined_client(4);

        for (position, id) in ids.iter().enumerate() {
            // Timestamps deliberately run backwards; order must not care
            let _ = client.handle(ClientEvent::Received(Event::ChatMessage(WireMessage {
                id: *id,
                sender: Sender::from(Identity::parse("peer").expect("non-empty")),
                text: format!("m{position}"),
                ts: 2_000_000 - position as u64,
            })));
        }

        let mut expected = Vec::new();
        for id in &ids {
            if !expected.contains(id) {
                expected.push(*id);
            }
        }

        let observed: Vec<u64> = client.view().messages.iter().map(|m| m.id).collect();

        // PROPERTY: first-arrival order, collisions collapse in place
        prop_assert_eq!(observed, expected);
    });
}
