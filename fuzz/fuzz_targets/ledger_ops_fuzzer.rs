//! Fuzz target for the message ledger.
//!
//! Applies arbitrary operation sequences and checks the structural
//! invariants: at most one entry per id, arrival order preserved for
//! surviving entries, and no operation ever panics.

#![no_main]

use arbitrary::Arbitrary;
use banter_client::MessageLedger;
use banter_proto::{Identity, Sender, WireMessage};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum LedgerOp {
    AppendLocal { id: u64, text: String, ts: u64 },
    AppendRemote { id: u64, sender: String, text: String, ts: u64 },
    AppendSystem { id: u64, text: String, ts: u64 },
    MarkRead { ids: Vec<u64> },
    FlagReadByMe { ids: Vec<u64> },
}

fuzz_target!(|ops: Vec<LedgerOp>| {
    let me = Identity::parse("me").expect("static name is non-empty");
    let mut ledger = MessageLedger::new();

    for op in ops {
        match op {
            LedgerOp::AppendLocal { id, text, ts } => {
                let _ = ledger.append_local(id, me.clone(), &text, ts);
            },
            LedgerOp::AppendRemote { id, sender, text, ts } => {
                ledger.append_remote(WireMessage { id, sender: Sender::from(sender), text, ts });
            },
            LedgerOp::AppendSystem { id, text, ts } => {
                ledger.append_system(id, text, ts);
            },
            LedgerOp::MarkRead { ids } => {
                let _ = ledger.mark_status(&me, &ids, banter_client::MessageStatus::Read);
            },
            LedgerOp::FlagReadByMe { ids } => {
                ledger.flag_read_by_me(&ids);
            },
        }

        // INVARIANT: ids are unique
        let mut ids: Vec<u64> = ledger.entries().iter().map(|entry| entry.id).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len(), "duplicate id in ledger");

        // INVARIANT: the unread set never contains own or system entries
        for unread in ledger.unread_ids(&me) {
            let entry = ledger
                .entries()
                .iter()
                .find(|entry| entry.id == unread)
                .expect("unread id must exist");
            assert!(!entry.sender.is_system(), "system entry reported unread");
            assert!(!entry.authored_by(&me), "own entry reported unread");
        }
    }
});
