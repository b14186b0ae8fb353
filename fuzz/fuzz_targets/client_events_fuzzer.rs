//! Fuzz target for the client state machine.
//!
//! Drives the full `Client` with arbitrary inbound wire events and user
//! actions. The state machine is infallible by contract, so the only
//! assertion is that nothing panics and the derived view stays computable.

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use banter_client::{Client, ClientEvent, Environment};
use banter_harness::SimEnv;
use banter_proto::{Event, Identity, Sender, WireMessage};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzInput {
    Connecting,
    Connected,
    Disconnected,
    Join { name: String },
    InputChanged { text: String },
    SendMessage,
    AdvanceAndTick { millis: u16 },
    RoomNotice { text: String },
    Roster { names: Vec<String> },
    ChatMessage { id: u64, sender: String, text: String, ts: u64 },
    TypingStart { name: String },
    TypingStop { name: String },
    MarkReadEcho { ids: Vec<u64> },
    MessagesRead { ids: Vec<u64> },
}

fn wire_identity(name: String) -> Identity {
    Identity::parse(&name).unwrap_or_else(|| Identity::parse("peer").expect("static name"))
}

fuzz_target!(|inputs: Vec<FuzzInput>| {
    let env = SimEnv::new(0xB417E6);
    let mut client = Client::new(env.clone());

    for input in inputs {
        let event = match input {
            FuzzInput::Connecting => ClientEvent::Connecting,
            FuzzInput::Connected => ClientEvent::Connected,
            FuzzInput::Disconnected => ClientEvent::Disconnected,
            FuzzInput::Join { name } => ClientEvent::Join { name },
            FuzzInput::InputChanged { text } => ClientEvent::InputChanged { text },
            FuzzInput::SendMessage => ClientEvent::SendMessage,
            FuzzInput::AdvanceAndTick { millis } => {
                env.advance(Duration::from_millis(u64::from(millis)));
                ClientEvent::Tick { now: env.now() }
            },
            FuzzInput::RoomNotice { text } => ClientEvent::Received(Event::RoomNotice(text)),
            FuzzInput::Roster { names } => ClientEvent::Received(Event::OnlineRoster(
                names.into_iter().map(wire_identity).collect(),
            )),
            FuzzInput::ChatMessage { id, sender, text, ts } => {
                ClientEvent::Received(Event::ChatMessage(WireMessage {
                    id,
                    sender: Sender::from(sender),
                    text,
                    ts,
                }))
            },
            FuzzInput::TypingStart { name } => {
                ClientEvent::Received(Event::TypingStart(wire_identity(name)))
            },
            FuzzInput::TypingStop { name } => {
                ClientEvent::Received(Event::TypingStop(wire_identity(name)))
            },
            FuzzInput::MarkReadEcho { ids } => ClientEvent::Received(Event::MarkRead(ids)),
            FuzzInput::MessagesRead { ids } => ClientEvent::Received(Event::MessagesRead(ids)),
        };

        let _ = client.handle(event);
        let _ = client.view();
    }
});
