//! Ordered, deduplicated, mutable log of chat entries.
//!
//! Ledger order is local arrival order: local sends append immediately
//! (optimistic echo), remote messages append when they arrive. Entries are
//! never re-sorted by timestamp, so display order can diverge from causal
//! order under network jitter. That is the contract, not a defect.
//!
//! # Invariants
//!
//! - At most one entry per id: an id collision replaces the existing entry
//!   in place (last write wins) and never disturbs ledger order.
//! - `status` is meaningful only for locally-authored entries; inbound
//!   read signals never touch other senders' entries.

use banter_proto::{Identity, MessageId, Sender, WireMessage};

/// Delivery status of a locally-authored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// Constructed locally. Entries never rest in this state: the protocol
    /// has no delivery ack, so a local append surfaces as [`Delivered`]
    /// within the same mutation.
    ///
    /// [`Delivered`]: MessageStatus::Delivered
    Sent,
    /// Handed to the transport. Optimistic: nothing on the wire confirms
    /// delivery.
    Delivered,
    /// Read by at least one other participant.
    Read,
}

/// One ledger entry: a wire message plus local-only annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    /// Unique message id.
    pub id: MessageId,
    /// Author of the message.
    pub sender: Sender,
    /// Message body, trimmed for local sends, verbatim for remote ones.
    pub text: String,
    /// Authoring time in Unix milliseconds.
    pub ts: u64,
    /// Delivery status. Only meaningful for locally-authored entries.
    pub status: MessageStatus,
    /// Whether the local user has seen this entry. Never serialized.
    pub read_by_me: bool,
}

impl MessageEntry {
    /// The wire shape of this entry, local annotations stripped.
    #[must_use]
    pub fn to_wire(&self) -> WireMessage {
        WireMessage { id: self.id, sender: self.sender.clone(), text: self.text.clone(), ts: self.ts }
    }

    /// True when `me` authored this entry. System entries belong to no one.
    #[must_use]
    pub fn authored_by(&self, me: &Identity) -> bool {
        self.sender.identity() == Some(me)
    }
}

/// The message ledger.
#[derive(Debug, Clone, Default)]
pub struct MessageLedger {
    entries: Vec<MessageEntry>,
}

impl MessageLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// All entries in arrival order.
    #[must_use]
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the ledger holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a locally-authored message.
    ///
    /// Whitespace-only text is rejected and nothing changes. On success
    /// the entry surfaces as [`MessageStatus::Delivered`] immediately (no
    /// delivery ack exists to wait for) and the trimmed wire form is
    /// returned for transmission.
    pub fn append_local(
        &mut self,
        id: MessageId,
        author: Identity,
        text: &str,
        ts: u64,
    ) -> Option<WireMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let entry = MessageEntry {
            id,
            sender: Sender::from(author),
            text: trimmed.to_owned(),
            ts,
            status: MessageStatus::Delivered,
            read_by_me: true,
        };
        let wire = entry.to_wire();
        self.upsert(entry);
        Some(wire)
    }

    /// Append an inbound message as-is.
    ///
    /// No dedup against optimistic local copies is needed: the backend
    /// never echoes a message back to its author. A colliding id replaces
    /// the existing entry in place.
    pub fn append_remote(&mut self, message: WireMessage) {
        self.upsert(MessageEntry {
            id: message.id,
            sender: message.sender,
            text: message.text,
            ts: message.ts,
            status: MessageStatus::Delivered,
            read_by_me: false,
        });
    }

    /// Append a synthetic system notice. System entries are excluded from
    /// mine/theirs and unread computations.
    pub fn append_system(&mut self, id: MessageId, text: String, ts: u64) {
        self.upsert(MessageEntry {
            id,
            sender: Sender::System,
            text,
            ts,
            status: MessageStatus::Delivered,
            read_by_me: true,
        });
    }

    /// Bulk status transition on locally-authored entries.
    ///
    /// Entries with other senders, system entries, and unknown ids are
    /// untouched. Idempotent: re-applying the same transition changes
    /// nothing. Returns how many entries changed.
    pub fn mark_status(&mut self, me: &Identity, ids: &[MessageId], status: MessageStatus) -> usize {
        let mut changed = 0;
        for entry in &mut self.entries {
            if entry.status != status && entry.authored_by(me) && ids.contains(&entry.id) {
                entry.status = status;
                changed += 1;
            }
        }
        changed
    }

    /// The unread set: ids of entries authored by someone else (system
    /// entries excluded) that the local user has not seen. Derived fresh
    /// on every call, never stored.
    #[must_use]
    pub fn unread_ids(&self, me: &Identity) -> Vec<MessageId> {
        self.entries
            .iter()
            .filter(|entry| {
                !entry.read_by_me && !entry.sender.is_system() && !entry.authored_by(me)
            })
            .map(|entry| entry.id)
            .collect()
    }

    /// Flag the listed entries as seen by the local user. Idempotent.
    pub fn flag_read_by_me(&mut self, ids: &[MessageId]) {
        for entry in &mut self.entries {
            if ids.contains(&entry.id) {
                entry.read_by_me = true;
            }
        }
    }

    /// Insert an entry, replacing any existing entry with the same id in
    /// place. Replacement keeps the original position so a collision never
    /// reorders the ledger.
    fn upsert(&mut self, entry: MessageEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }
}
