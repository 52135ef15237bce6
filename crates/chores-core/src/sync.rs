//! Cross-surface session synchronization bus.
//!
//! Reading the session cookie is a synchronous, purely local operation, so
//! one surface cannot know another changed it without an explicit signal.
//! `SyncBus` is that signal: a broadcast channel under a single well-known
//! key. Every login/logout action publishes; every session tracker
//! subscribes and re-reads the cookie store on each event. A publisher
//! receives its own event too, but re-reading is idempotent and trackers
//! only notify on an actual value change.

use tokio::sync::broadcast;
use uuid::Uuid;

/// Well-known name of the sync signal, shared by every surface of the app.
pub const SYNC_KEY: &str = "cookie-sync";

/// Queued events per subscriber before old ones are dropped. Subscribers
/// that lag simply re-read once more; no event carries state.
const CHANNEL_CAPACITY: usize = 16;

/// A single cookie-change announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncEvent {
    /// Identifies the surface that performed the login/logout action.
    pub origin: Uuid,
}

/// Broadcast channel connecting every session tracker of the process.
#[derive(Debug, Clone)]
pub struct SyncBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl SyncBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announces a cookie change to every subscribed tracker.
    ///
    /// Publishing with no subscribers is a no-op.
    pub fn publish(&self, origin: Uuid) {
        let _ = self.tx.send(SyncEvent { origin });
    }

    /// Registers for cookie-change announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new()
    }
}
