//! OIDC login/logout handoff.
//!
//! Authentication itself is owned by the backend: the browser walks
//! through `/oidc/login`, the identity provider, and the backend callback,
//! which sets the session cookies. The native client opens the browser,
//! accepts the resulting session line pasted back by the user, and records
//! it. Logout tells the backend best-effort and always clears the local
//! session.

use anyhow::{Context, Result};

use crate::session::{CookieStore, SessionTracker, USER_COOKIE};

/// Builds the browser URL that starts the OIDC login handoff.
pub fn login_url(base_url: &str) -> String {
    format!("{}/oidc/login", base_url.trim_end_matches('/'))
}

/// Builds the backend URL that ends the session server-side.
pub fn logout_url(base_url: &str) -> String {
    format!("{}/oidc/logout", base_url.trim_end_matches('/'))
}

/// Parses a pasted session input into a cookie store.
///
/// Accepts, in order of tolerance:
/// - a raw `user` cookie value (the `{"name": ...}` JSON record),
/// - a full `Cookie:` header line (`user=...; oidc_token=...`),
/// - bare `name=value` pairs separated by `;`.
///
/// Returns `None` when no `user` cookie can be recovered from the input.
pub fn parse_session_input(input: &str) -> Option<CookieStore> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if value.starts_with('{') {
        let mut store = CookieStore::default();
        store.set(USER_COOKIE, value);
        return Some(store);
    }

    let value = value
        .strip_prefix("Cookie:")
        .map(str::trim)
        .unwrap_or(value);
    if value.contains('=') {
        let mut store = CookieStore::default();
        for pair in value.split(';') {
            let Some((name, val)) = pair.split_once('=') else {
                continue;
            };
            store.set(name.trim(), val.trim());
        }
        if store.get(USER_COOKIE).is_some() {
            return Some(store);
        }
    }

    None
}

/// Completes a login with a pasted session line and broadcasts the change.
///
/// # Errors
/// Returns an error if the input holds no session or the store cannot be
/// written.
pub fn complete_login(tracker: &SessionTracker, input: &str) -> Result<()> {
    let cookies =
        parse_session_input(input).context("Could not read a session from the pasted input")?;
    tracker.complete_login(&cookies)
}

/// Logs out: best-effort backend call, then local clear and broadcast.
///
/// The local session is cleared even when the backend is unreachable.
///
/// # Errors
/// Returns an error if the local cookie store cannot be removed.
pub async fn logout(base_url: &str, tracker: &SessionTracker) -> Result<()> {
    let client = reqwest::Client::new();
    match client.get(logout_url(base_url)).send().await {
        Ok(_) => {}
        Err(err) => {
            tracing::debug!(error = %err, "backend logout failed, clearing local session anyway");
        }
    }
    tracker.complete_logout()
}
