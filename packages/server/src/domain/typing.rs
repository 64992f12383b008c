//! Typing indicator state.
//!
//! Signals are ephemeral. Each one carries a deadline on the monotonic clock
//! and expires by time; there is no explicit "stopped typing" event.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use super::value_object::{RoomName, UserName};

/// How long receivers display a typing signal
pub const TYPING_DISPLAY_TIMEOUT: Duration = Duration::from_secs(3);

/// Minimum spacing between two forwarded signals for the same scope
pub const TYPING_RESEND_GATE: Duration = Duration::from_secs(2);

/// Audience of a typing signal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypingScope {
    Group,
    Private(UserName),
    Room(RoomName),
}

#[derive(Debug, Clone, Copy)]
struct TypingState {
    last_forwarded: Instant,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct TypingTracker {
    entries: HashMap<(UserName, TypingScope), TypingState>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a typing intent at `now`.
    ///
    /// Returns `true` when the signal should be forwarded: the first signal,
    /// and any signal arriving after the resend gate or after expiry. Gated
    /// signals still push the deadline forward.
    pub fn record(&mut self, user: UserName, scope: TypingScope, now: Instant) -> bool {
        self.prune(now);
        let expires_at = now + TYPING_DISPLAY_TIMEOUT;
        let key = (user, scope);
        if let Some(state) = self.entries.get_mut(&key) {
            if now.duration_since(state.last_forwarded) < TYPING_RESEND_GATE {
                state.expires_at = expires_at;
                return false;
            }
        }
        self.entries.insert(
            key,
            TypingState {
                last_forwarded: now,
                expires_at,
            },
        );
        true
    }

    pub fn is_typing(&self, user: &UserName, scope: &TypingScope, now: Instant) -> bool {
        self.entries
            .get(&(user.clone(), scope.clone()))
            .is_some_and(|state| now < state.expires_at)
    }

    /// Users currently typing in `scope`, sorted
    pub fn typists(&self, scope: &TypingScope, now: Instant) -> Vec<UserName> {
        let mut users: Vec<UserName> = self
            .entries
            .iter()
            .filter(|((_, s), state)| s == scope && now < state.expires_at)
            .map(|((user, _), _)| user.clone())
            .collect();
        users.sort();
        users
    }

    pub fn clear_user(&mut self, user: &UserName) {
        self.entries.retain(|(u, _), _| u != user);
    }

    /// Forget signals whose deadline has passed
    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|_, state| now < state.expires_at);
    }
}
