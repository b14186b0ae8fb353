//! Derived view model.
//!
//! [`ChatView`] is the read-only snapshot handed to the rendering
//! surface: the ordered message list, who is typing, who is online, the
//! session state, and the composer draft. It is recomputed from client
//! state after every mutation; there is a single writer per state slice,
//! so "recompute on change" is the whole invalidation protocol.

use banter_proto::{Identity, MessageId, Sender};

use crate::{
    ledger::{MessageLedger, MessageStatus},
    session::SessionState,
};

/// Snapshot of everything the rendering surface needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    /// Connection lifecycle state, for status display.
    pub session: SessionState,
    /// The local user's display name. `None` until the join action.
    pub identity: Option<Identity>,
    /// Messages in ledger (arrival) order.
    pub messages: Vec<MessageView>,
    /// Identities currently composing, in first-seen order.
    pub typists: Vec<Identity>,
    /// Online identities in backend order.
    pub roster: Vec<Identity>,
    /// Current composer content, owned by the client so a send can clear
    /// the input surface.
    pub draft: String,
}

/// One message as the rendering surface sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    /// Unique message id, usable as a render key.
    pub id: MessageId,
    /// Author of the message.
    pub sender: Sender,
    /// Message body.
    pub text: String,
    /// Authoring time in Unix milliseconds.
    pub ts: u64,
    /// Delivery status. Only meaningful when `mine` is set.
    pub status: MessageStatus,
    /// True when the local user authored this message.
    pub mine: bool,
}

impl ChatView {
    /// Derive a fresh view from the current client state.
    pub(crate) fn derive(
        session: SessionState,
        identity: Option<&Identity>,
        ledger: &MessageLedger,
        typists: &[Identity],
        roster: &[Identity],
        draft: &str,
    ) -> Self {
        let messages = ledger
            .entries()
            .iter()
            .map(|entry| MessageView {
                id: entry.id,
                sender: entry.sender.clone(),
                text: entry.text.clone(),
                ts: entry.ts,
                status: entry.status,
                mine: identity.is_some_and(|me| entry.authored_by(me)),
            })
            .collect();

        Self {
            session,
            identity: identity.cloned(),
            messages,
            typists: typists.to_vec(),
            roster: roster.to_vec(),
            draft: draft.to_owned(),
        }
    }
}
