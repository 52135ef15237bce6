//! API access layer: the single chokepoint for authenticated backend
//! calls, with uniform failure classification.
//!
//! Every failed request is classified exactly once, by HTTP status: 401
//! silently invalidates the session, 403 raises a scoped warning notice,
//! anything else (network failure, 5xx, undecodable response) raises the
//! generic failure notice. All three still fail the pending result, so
//! callers can apply local handling (re-enable a submit control, print a
//! hint) on top of the global signals. No retries are performed here.

use std::fmt;

use reqwest::StatusCode;
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::notify::{Notice, Notifier};
use crate::session::SessionTracker;

/// Standard User-Agent header for chores API requests.
pub const USER_AGENT: &str = concat!("chores/", env!("CARGO_PKG_VERSION"));

/// Longest excerpt of an error response body kept for diagnostics.
const BODY_EXCERPT_LEN: usize = 256;

/// The complete failure vocabulary of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 401: the session is gone; the logged-out view is the recovery.
    Unauthenticated,
    /// 403: authenticated, but not allowed to touch this resource.
    Forbidden,
    /// Everything else: network failure, 5xx, undecodable response.
    Other,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::Unauthenticated => write!(f, "unauthenticated"),
            FailureClass::Forbidden => write!(f, "forbidden"),
            FailureClass::Other => write!(f, "other"),
        }
    }
}

/// Maps a response status to a failure class.
///
/// Pure; the side effects of each class live in the request path.
pub fn classify(status: Option<StatusCode>) -> FailureClass {
    match status {
        Some(StatusCode::UNAUTHORIZED) => FailureClass::Unauthenticated,
        Some(StatusCode::FORBIDDEN) => FailureClass::Forbidden,
        _ => FailureClass::Other,
    }
}

/// A classified request failure.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Recovery action already applied at the API boundary.
    pub class: FailureClass,
    /// HTTP status, when the failure had one.
    pub status: Option<StatusCode>,
    /// One-line summary suitable for logs.
    pub message: String,
    /// Optional response-body excerpt.
    pub details: Option<String>,
}

impl ApiError {
    fn http(status: StatusCode, body: &str) -> Self {
        let details = if body.is_empty() {
            None
        } else {
            Some(body.chars().take(BODY_EXCERPT_LEN).collect())
        };
        Self {
            class: classify(Some(status)),
            status: Some(status),
            message: format!("HTTP {status}"),
            details,
        }
    }

    fn transport(err: &reqwest::Error) -> Self {
        Self {
            class: FailureClass::Other,
            status: None,
            message: format!("Request failed: {err}"),
            details: None,
        }
    }

    fn decode(err: &reqwest::Error) -> Self {
        Self {
            class: FailureClass::Other,
            status: None,
            message: format!("Malformed response: {err}"),
            details: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Authenticated client for the chore-tracker backend.
///
/// Cheap to clone; clones share the HTTP connection pool, the session
/// tracker and the notifier.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tracker: SessionTracker,
    notifier: Notifier,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tracker: SessionTracker, notifier: Notifier) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            tracker,
            notifier,
        }
    }

    /// Returns a builder bound to `/api{path_suffix}`.
    pub fn request(&self, path_suffix: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            url: format!("{}/api{}", self.base_url, path_suffix),
        }
    }

    fn authenticated(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(header::USER_AGENT, USER_AGENT);
        match self.tracker.cookie_header() {
            Some(cookies) => builder.header(header::COOKIE, cookies),
            None => builder,
        }
    }

    /// Sends the request and classifies transport and status failures.
    async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = match self.authenticated(builder).send().await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(ApiError::transport(&err))),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.fail(ApiError::http(status, &body)));
        }

        Ok(response)
    }

    /// Applies the classified recovery action. Called exactly once per
    /// failed request.
    fn fail(&self, err: ApiError) -> ApiError {
        match err.class {
            FailureClass::Unauthenticated => {
                // Silent: the logged-out view itself is the recovery.
                tracing::debug!("401 from backend, invalidating session");
                self.tracker.invalidate();
            }
            FailureClass::Forbidden => {
                self.notifier.push(Notice::forbidden());
            }
            FailureClass::Other => {
                tracing::warn!(error = %err, status = ?err.status, "request failed");
                self.notifier.push(Notice::request_failed());
            }
        }
        err
    }
}

/// A pending request bound to one backend path.
pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    url: String,
}

impl RequestBuilder<'_> {
    /// Issues a GET and decodes the JSON response.
    ///
    /// # Errors
    /// Returns a classified error; its recovery action has already run.
    pub async fn get<T: DeserializeOwned>(self) -> ApiResult<T> {
        let response = self.client.send(self.client.http.get(&self.url)).await?;
        self.decode(response).await
    }

    /// Issues a POST with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    /// Returns a classified error; its recovery action has already run.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(self, body: &B) -> ApiResult<T> {
        let response = self
            .client
            .send(self.client.http.post(&self.url).json(body))
            .await?;
        self.decode(response).await
    }

    /// Issues a POST where only the status matters.
    ///
    /// # Errors
    /// Returns a classified error; its recovery action has already run.
    pub async fn post_unit<B: Serialize + ?Sized>(self, body: &B) -> ApiResult<()> {
        self.client
            .send(self.client.http.post(&self.url).json(body))
            .await
            .map(drop)
    }

    async fn decode<T: DeserializeOwned>(self, response: reqwest::Response) -> ApiResult<T> {
        match response.json::<T>().await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.client.fail(ApiError::decode(&err))),
        }
    }
}
