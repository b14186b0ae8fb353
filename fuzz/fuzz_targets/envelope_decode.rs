//! Fuzz target for the JSON envelope codec.
//!
//! Feeds arbitrary bytes into `Event::decode` and checks:
//! - Decode never panics, whatever the input
//! - Anything that decodes re-encodes and decodes to the same value

#![no_main]

use banter_proto::Event;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(event) = Event::decode(text) else {
        return;
    };

    let encoded = event.encode().expect("decoded event must re-encode");
    let round_tripped = Event::decode(&encoded).expect("re-encoded envelope must decode");
    assert_eq!(round_tripped, event, "round-trip changed the event");
});
