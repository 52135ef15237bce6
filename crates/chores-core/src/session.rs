//! Session state derived from the backend-set cookies.
//!
//! After a completed OIDC handoff the backend sets two cookies: `user`, a
//! readable JSON `{"name": ...}` record, and `oidc_token`, an opaque token
//! the client forwards on API requests but never inspects. The native
//! client keeps both in `<CHORES_HOME>/cookies.json` with restricted
//! permissions (0600). Presence of a decodable `user` cookie is the sole
//! session signal; everything else means logged out.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::paths;
use crate::domain::User;
use crate::sync::SyncBus;

/// Cookie holding the serialized user record.
pub const USER_COOKIE: &str = "user";
/// Opaque auth token cookie, forwarded verbatim on API requests.
pub const TOKEN_COOKIE: &str = "oidc_token";

/// Cookie cache filename.
const COOKIES_FILE: &str = "cookies.json";

/// The client's cached belief about whether a user is authenticated.
///
/// Always derivable from the cookie store at the time of last observation;
/// never an independent source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn {
        user: User,
    },
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    /// Returns the logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::LoggedIn { user } => Some(user),
            Session::LoggedOut => None,
        }
    }
}

/// File-backed store of the backend-set cookies.
///
/// Name -> value mapping. Only the backend produces values; the client
/// records them on login and discards them on logout or invalidation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieStore {
    #[serde(flatten)]
    cookies: BTreeMap<String, String>,
}

impl CookieStore {
    /// Returns the default path of the cookie store file.
    pub fn store_path() -> PathBuf {
        paths::chores_home().join(COOKIES_FILE)
    }

    /// Loads the cookie store from a path.
    /// Returns an empty store if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cookies from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cookies from {}", path.display()))
    }

    /// Saves the cookie store to a path with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize cookies")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Gets a cookie value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Sets a cookie value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.cookies.insert(name.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Renders the `Cookie` request header value, or `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }
}

/// Removes the cookie store file, if present.
fn clear_cookies_at(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove cookies at {}", path.display()))?;
    }
    Ok(())
}

/// Decodes the session from a cookie store.
///
/// Fails soft: a malformed or absent `user` cookie yields `LoggedOut`,
/// never an error.
pub fn read_session(store: &CookieStore) -> Session {
    let Some(raw) = store.get(USER_COOKIE) else {
        return Session::LoggedOut;
    };
    match serde_json::from_str::<User>(raw) {
        Ok(user) => Session::LoggedIn { user },
        Err(err) => {
            tracing::warn!(error = %err, "undecodable user cookie, treating as logged out");
            Session::LoggedOut
        }
    }
}

struct TrackerState {
    store_path: PathBuf,
    tx: watch::Sender<Session>,
}

impl TrackerState {
    /// Re-reads the cookie store and notifies only on an actual change.
    fn refresh(&self) {
        let store = CookieStore::load_from(&self.store_path).unwrap_or_default();
        let session = read_session(&store);
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    fn force_logged_out(&self) {
        self.tx.send_if_modified(|current| {
            if current.is_logged_in() {
                *current = Session::LoggedOut;
                true
            } else {
                false
            }
        });
    }
}

/// Tracks "who is logged in, and as whom" and propagates changes to every
/// subscriber, including changes performed by other surfaces via the sync
/// bus.
///
/// Clones share state; a clone is the same "tab", not a new one. The
/// tracker performs no network I/O.
#[derive(Clone)]
pub struct SessionTracker {
    state: Arc<TrackerState>,
    bus: SyncBus,
    origin: Uuid,
}

impl SessionTracker {
    /// Creates a tracker over the default cookie store, listening on `bus`.
    pub fn spawn(bus: SyncBus) -> Self {
        Self::spawn_at(CookieStore::store_path(), bus)
    }

    /// Creates a tracker reading cookies at `store_path`, listening on `bus`.
    ///
    /// The bus listener holds only a weak reference to the tracker state
    /// and exits once every tracker handle is dropped, so completions
    /// arriving after teardown are no-ops.
    pub fn spawn_at(store_path: PathBuf, bus: SyncBus) -> Self {
        let store = CookieStore::load_from(&store_path).unwrap_or_default();
        let (tx, _rx) = watch::channel(read_session(&store));
        let state = Arc::new(TrackerState { store_path, tx });

        let weak: Weak<TrackerState> = Arc::downgrade(&state);
        let mut events = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    // A lagged receiver only means missed announcements;
                    // one re-read catches up.
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        let Some(state) = weak.upgrade() else { break };
                        state.refresh();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Self {
            state,
            bus,
            origin: Uuid::new_v4(),
        }
    }

    /// Returns the current session without waiting for a bus round-trip.
    pub fn read(&self) -> Session {
        self.state.tx.borrow().clone()
    }

    /// Registers for change notifications.
    ///
    /// Dropping the receiver unregisters it.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.tx.subscribe()
    }

    /// Forces the tracked state to logged-out immediately, without waiting
    /// for a bus round-trip. Used after a detected authorization failure.
    ///
    /// The stored cookies are discarded too: the backend no longer honors
    /// them, and other surfaces re-derive their state from the store.
    pub fn invalidate(&self) {
        if let Err(err) = clear_cookies_at(&self.state.store_path) {
            tracing::warn!(error = %err, "could not clear stale cookies");
        }
        self.state.force_logged_out();
        self.bus.publish(self.origin);
    }

    /// Records the backend-set cookies after a completed login and
    /// announces the change on the bus.
    ///
    /// # Errors
    /// Returns an error if the cookie store cannot be written.
    pub fn complete_login(&self, cookies: &CookieStore) -> Result<()> {
        cookies.save_to(&self.state.store_path)?;
        self.state.refresh();
        self.bus.publish(self.origin);
        Ok(())
    }

    /// Discards the stored cookies after a logout and announces the change.
    ///
    /// # Errors
    /// Returns an error if the cookie store cannot be removed.
    pub fn complete_logout(&self) -> Result<()> {
        clear_cookies_at(&self.state.store_path)?;
        self.state.refresh();
        self.bus.publish(self.origin);
        Ok(())
    }

    /// Renders the `Cookie` header for an authenticated request, or `None`
    /// when no cookies are stored.
    pub fn cookie_header(&self) -> Option<String> {
        CookieStore::load_from(&self.state.store_path)
            .unwrap_or_default()
            .header_value()
    }
}
