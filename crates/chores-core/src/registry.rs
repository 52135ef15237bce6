//! Shared cache of the current user's households.
//!
//! The registry is populated by exactly one background fetch per lifetime
//! and extended locally when a creation succeeds. `None` is the distinct
//! "not yet loaded" state that consumers render as busy, as opposed to
//! `Some(vec![])`, loaded but empty. Consumers subscribe; they never hold
//! a competing copy of the list.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::domain::Household;

struct Inner {
    tx: watch::Sender<Option<Vec<Household>>>,
    version: AtomicU64,
    load_started: AtomicBool,
}

impl Inner {
    fn mutate(&self, f: impl FnOnce(&mut Option<Vec<Household>>)) {
        self.tx.send_modify(f);
        self.version.fetch_add(1, Ordering::SeqCst);
    }
}

/// The appendable household registry.
///
/// Cheap to clone; clones share the same list.
#[derive(Clone)]
pub struct HouseholdRegistry {
    inner: Arc<Inner>,
}

impl HouseholdRegistry {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                tx,
                version: AtomicU64::new(0),
                load_started: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the current list, or `None` while not yet loaded.
    pub fn households(&self) -> Option<Vec<Household>> {
        self.inner.tx.borrow().clone()
    }

    /// Registers for list change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<Household>>> {
        self.inner.tx.subscribe()
    }

    /// Monotonic change counter, used by [`Lookup`] for memoization.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }

    /// Appends a household to the list.
    ///
    /// If the list has not loaded yet this transitions it to loaded with
    /// the single new entry, covering the moment between a successful
    /// creation and the background fetch resolving.
    pub fn add_household(&self, household: Household) {
        self.inner.mutate(|list| {
            list.get_or_insert_with(Vec::new).push(household);
        });
    }

    /// Starts the one background fetch for this registry's lifetime and
    /// returns its handle. Subsequent calls are no-ops returning `None`.
    ///
    /// The fetch holds only a weak reference to the registry: a completion
    /// arriving after every handle was dropped does nothing. A failed
    /// fetch leaves the list unset; the failure itself has already been
    /// classified by the API layer.
    pub fn load(&self, api: &ApiClient) -> Option<JoinHandle<()>> {
        if self.inner.load_started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let api = api.clone();
        let weak = Arc::downgrade(&self.inner);
        Some(tokio::spawn(async move {
            let fetched = api.request("/household").get::<Vec<Household>>().await;
            let Some(inner) = weak.upgrade() else { return };
            match fetched {
                Ok(households) => {
                    inner.mutate(|list| {
                        // Households created while the fetch was in flight
                        // stay appended behind the backend's ordering.
                        let appended: Vec<Household> = list
                            .take()
                            .unwrap_or_default()
                            .into_iter()
                            .filter(|h| !households.iter().any(|f| f.id == h.id))
                            .collect();
                        let mut merged = households;
                        merged.extend(appended);
                        *list = Some(merged);
                    });
                    tracing::debug!("household registry loaded");
                }
                Err(err) => {
                    tracing::debug!(error = %err, "household fetch failed");
                }
            }
        }))
    }
}

impl Default for HouseholdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoized find-by-id over the registry list and the active identifier.
///
/// Recomputes only when the registry version or the identifier changes,
/// mirroring a derived value that a route-driven page recreates on
/// navigation.
#[derive(Debug, Default)]
pub struct Lookup {
    cached: Option<(u64, String, Option<Household>)>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the household with the given id, or `None` when absent or
    /// while the registry is not yet loaded.
    pub fn find(&mut self, registry: &HouseholdRegistry, id: &str) -> Option<Household> {
        let version = registry.version();
        if let Some((cached_version, cached_id, result)) = &self.cached
            && *cached_version == version
            && cached_id == id
        {
            return result.clone();
        }

        let result = registry
            .households()
            .and_then(|list| list.into_iter().find(|h| h.id == id));
        self.cached = Some((version, id.to_string(), result.clone()));
        result
    }
}
