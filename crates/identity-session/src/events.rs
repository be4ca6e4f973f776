//! Session lifecycle event channel.
//!
//! Fan-out, not a queue: every current subscriber sees every event emitted
//! after it subscribed, in emission order; late subscribers miss past events.
//! Emission never blocks the caller.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

/// Session lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The access token will expire within the configured lead time.
    TokenExpiring,
    /// The access token has expired.
    TokenExpired,
    /// A user session has been established or re-established.
    UserLoaded,
    /// The user session has been terminated.
    UserUnloaded,
    /// An automatic silent renew attempt failed.
    SilentRenewError(String),
    /// The user signed in.
    SignedIn,
    /// The user signed out.
    SignedOut,
    /// The user's session at the provider changed (cross-tab awareness).
    SessionChanged,
}

/// Broadcast channel for [`SessionEvent`]s.
#[derive(Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to events emitted from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers. A send with no subscribers
    /// is not an error.
    pub fn emit(&self, event: SessionEvent) {
        tracing::trace!(event = ?event, "Session event");
        let _ = self.tx.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
