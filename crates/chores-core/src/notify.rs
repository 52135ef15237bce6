//! User-visible notices for classified request failures.
//!
//! The core never prints. It emits persistent notices over a channel and
//! the owning surface decides how to render them. Notices never
//! auto-dismiss; dismissal is the surface's call.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Where to send people when something breaks.
const ISSUE_URL: &str = "https://github.com/chore-tracker/chores/issues/new";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A persistent, user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Notice for a 403 on a household-scoped request.
    pub fn forbidden() -> Self {
        Self {
            severity: Severity::Warning,
            title: "Not allowed to view this page!".to_string(),
            message: "You are no longer a member of this household or never were.".to_string(),
        }
    }

    /// Generic notice for transient or unknown request failures.
    pub fn request_failed() -> Self {
        Self {
            severity: Severity::Error,
            title: "Something just broke...".to_string(),
            message: format!("If this keeps happening, please report an issue at {ISSUE_URL}."),
        }
    }
}

/// Cloneable sending half handed to the API layer.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Creates a connected notifier/stream pair.
    pub fn channel() -> (Self, NoticeStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, NoticeStream { rx })
    }

    /// Emits a notice.
    ///
    /// A notice arriving after its surface has gone away is dropped
    /// silently; stale completions must not become errors.
    pub fn push(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }
}

/// Receiving half, drained by the owning surface.
#[derive(Debug)]
pub struct NoticeStream {
    rx: mpsc::UnboundedReceiver<Notice>,
}

impl NoticeStream {
    /// Waits for the next notice. Returns `None` once every notifier is gone.
    pub async fn next(&mut self) -> Option<Notice> {
        self.rx.recv().await
    }

    /// Drains everything currently queued without waiting.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.rx.try_recv() {
            notices.push(notice);
        }
        notices
    }
}
