//! Command handlers and the plumbing they share.

use anyhow::Result;
use chores_core::api::ApiClient;
use chores_core::forms::FieldError;
use chores_core::notify::{Notifier, NoticeStream};
use chores_core::registry::HouseholdRegistry;
use chores_core::session::SessionTracker;
use chores_core::sync::SyncBus;

pub mod auth;
pub mod household;
pub mod task;

/// Shared plumbing every command runs against: one session tracker on one
/// sync bus, one API client, one household registry, one notice stream.
pub struct App {
    pub server_url: String,
    pub tracker: SessionTracker,
    pub api: ApiClient,
    pub registry: HouseholdRegistry,
    notices: NoticeStream,
    was_logged_in: bool,
}

impl App {
    pub fn new(server_url: &str) -> Self {
        let bus = SyncBus::new();
        let tracker = SessionTracker::spawn(bus);
        let (notifier, notices) = Notifier::channel();
        let api = ApiClient::new(server_url, tracker.clone(), notifier);
        let was_logged_in = tracker.read().is_logged_in();
        Self {
            server_url: server_url.to_string(),
            tracker,
            api,
            registry: HouseholdRegistry::new(),
            notices,
            was_logged_in,
        }
    }

    /// Renders queued notices to stderr and, when a failed command took
    /// the session down with it, points at `chores login`.
    pub fn finish(mut self, result: Result<()>) -> Result<()> {
        for notice in self.notices.drain() {
            eprintln!("{}: {}", notice.title, notice.message);
        }

        if result.is_err() && self.was_logged_in && !self.tracker.read().is_logged_in() {
            eprintln!("Your session has expired. Run `chores login` to log in again.");
        }

        result
    }
}

/// Prints field errors the way a form would show them and fails the
/// command without issuing any request.
pub(crate) fn fail_validation(errors: &[FieldError]) -> Result<()> {
    for error in errors {
        eprintln!("{}: {}", error.field, error.message);
    }
    anyhow::bail!("Validation failed")
}
