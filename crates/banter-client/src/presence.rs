//! Typing presence and online roster.
//!
//! Two halves. The remote half tracks who else is composing: an
//! insertion-ordered set driven by inbound start/stop signals, where a
//! duplicate start is a no-op and removal only ever happens on an explicit
//! stop, never on a timeout. The local half owns the quiet timer behind
//! the local user's own typing signals: keystrokes arm a deadline, ticks
//! check it, and the stop signal fires once when a full quiet interval
//! passes with no further keystrokes (debounce, not throttle).
//!
//! The timer is a stored timestamp checked on ticks rather than a detached
//! task, so dropping the tracker is all the cancellation teardown needs.

use std::{ops::Sub, time::Duration};

use banter_proto::Identity;

/// Quiet interval after the last keystroke before the local typing-stop
/// signal fires.
pub const TYPING_QUIET_INTERVAL: Duration = Duration::from_millis(900);

/// Typing presence and roster state.
///
/// Generic over `Instant` to support both real time and virtual time for
/// deterministic testing.
#[derive(Debug, Clone)]
pub struct PresenceTracker<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Identities currently composing, in first-seen order.
    typists: Vec<Identity>,
    /// Online identities, replaced wholesale on every roster event.
    roster: Vec<Identity>,
    /// Last local keystroke that yielded non-empty content. `None` when
    /// the quiet timer is disarmed.
    last_keystroke: Option<I>,
}

impl<I> PresenceTracker<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create an empty tracker with the quiet timer disarmed.
    pub fn new() -> Self {
        Self { typists: Vec::new(), roster: Vec::new(), last_keystroke: None }
    }

    /// Identities currently composing, in first-seen order.
    #[must_use]
    pub fn typists(&self) -> &[Identity] {
        &self.typists
    }

    /// The online roster in backend order.
    #[must_use]
    pub fn roster(&self) -> &[Identity] {
        &self.roster
    }

    /// Record an inbound typing-start. Set semantics: returns `true` when
    /// the identity is newly inserted, `false` for a duplicate start.
    pub fn typing_started(&mut self, who: Identity) -> bool {
        if self.typists.contains(&who) {
            return false;
        }
        self.typists.push(who);
        true
    }

    /// Record an inbound typing-stop. Returns `true` when the identity was
    /// present and is now removed; a stop for an absent identity is a
    /// no-op.
    pub fn typing_stopped(&mut self, who: &Identity) -> bool {
        let before = self.typists.len();
        self.typists.retain(|name| name != who);
        self.typists.len() != before
    }

    /// Replace the roster wholesale. The backend's ordering is
    /// authoritative; no merging with the previous roster happens.
    pub fn replace_roster(&mut self, names: Vec<Identity>) {
        self.roster = names;
    }

    /// Record a local keystroke that yielded non-empty content, (re)arming
    /// the quiet timer. Every keystroke restarts the full interval.
    pub fn keystroke(&mut self, now: I) {
        self.last_keystroke = Some(now);
    }

    /// Disarm the quiet timer (composer cleared or message sent).
    pub fn cancel_quiet(&mut self) {
        self.last_keystroke = None;
    }

    /// Check the quiet deadline.
    ///
    /// Returns `true` when a full quiet interval has elapsed since the
    /// last keystroke; the timer disarms in the same call, so the stop
    /// signal fires once per quiet period no matter how often ticks
    /// arrive.
    pub fn quiet_elapsed(&mut self, now: I) -> bool {
        match self.last_keystroke {
            Some(last) if now - last >= TYPING_QUIET_INTERVAL => {
                self.last_keystroke = None;
                true
            },
            _ => false,
        }
    }
}

impl<I> Default for PresenceTracker<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    fn default() -> Self {
        Self::new()
    }
}
