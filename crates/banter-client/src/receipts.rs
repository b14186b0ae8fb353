//! Read-receipt coordination.
//!
//! Two directions of receipt flow. Outbound: after any ledger change, an
//! acknowledge pass collects everything the local user has not yet seen,
//! flags it seen, and produces one batched acknowledgment. Inbound: a
//! read signal from the backend upgrades matching locally-authored
//! entries to read.
//!
//! The protocol is eventually-consistent and at-least-once: duplicated
//! signals in either direction land on idempotent flag assignments, so
//! re-delivery never corrupts state.

use banter_proto::{Identity, MessageId};

use crate::ledger::{MessageLedger, MessageStatus};

/// Acknowledge everything the local user has now seen.
///
/// Computes the unread set, flags each entry as seen, and returns the id
/// batch to send as one read acknowledgment. Returns `None` when nothing
/// is unread; re-running after a pass that found work is always a no-op,
/// so callers invoke this after every ledger mutation without tracking
/// whether the mutation could have added unread entries.
pub fn acknowledge(ledger: &mut MessageLedger, me: &Identity) -> Option<Vec<MessageId>> {
    let unread = ledger.unread_ids(me);
    if unread.is_empty() {
        return None;
    }
    ledger.flag_read_by_me(&unread);
    Some(unread)
}

/// Apply an inbound read signal.
///
/// Upgrades matching locally-authored entries to [`MessageStatus::Read`].
/// Entries authored by others, system entries, and unknown ids are
/// untouched. Returns how many entries changed, which is zero for a
/// re-delivered batch.
pub fn apply_read(ledger: &mut MessageLedger, me: &Identity, ids: &[MessageId]) -> usize {
    ledger.mark_status(me, ids, MessageStatus::Read)
}

#[cfg(test)]
mod tests {
    use banter_proto::{Sender, WireMessage};

    use super::*;

    fn identity(name: &str) -> Identity {
        Identity::parse(name).unwrap()
    }

    fn remote_message(id: MessageId, sender: &str, text: &str) -> WireMessage {
        WireMessage {
            id,
            sender: Sender::from(identity(sender)),
            text: text.to_string(),
            ts: 1_000,
        }
    }

    #[test]
    fn acknowledge_batches_all_unread_and_flags_them() {
        let mut ledger = MessageLedger::new();
        let me = identity("alice");
        ledger.append_remote(remote_message(1, "bob", "one"));
        ledger.append_remote(remote_message(2, "bob", "two"));

        assert_eq!(acknowledge(&mut ledger, &me), Some(vec![1, 2]));

        // Second pass finds nothing new
        assert_eq!(acknowledge(&mut ledger, &me), None);
    }

    #[test]
    fn acknowledge_skips_system_and_own_entries() {
        let mut ledger = MessageLedger::new();
        let me = identity("alice");
        ledger.append_system(1, "bob joined".to_string(), 1_000);
        ledger.append_local(2, me.clone(), "hello", 1_001);

        assert_eq!(acknowledge(&mut ledger, &me), None);
    }

    #[test]
    fn apply_read_is_idempotent_across_redelivery() {
        let mut ledger = MessageLedger::new();
        let me = identity("alice");
        ledger.append_local(1, me.clone(), "hello", 1_000);

        assert_eq!(apply_read(&mut ledger, &me, &[1]), 1);
        assert_eq!(ledger.entries()[0].status, MessageStatus::Read);

        // Same batch again: no change
        assert_eq!(apply_read(&mut ledger, &me, &[1]), 0);
        assert_eq!(ledger.entries()[0].status, MessageStatus::Read);
    }

    #[test]
    fn apply_read_never_touches_other_senders() {
        let mut ledger = MessageLedger::new();
        let me = identity("alice");
        ledger.append_remote(remote_message(1, "bob", "theirs"));

        assert_eq!(apply_read(&mut ledger, &me, &[1]), 0);
        assert_eq!(ledger.entries()[0].status, MessageStatus::Delivered);
    }
}
