//! Remote directory access.
//!
//! `UserSource` is the seam between the dashboard and the network: the
//! real implementation talks HTTP through reqwest, tests plug in stubs.
//! The [`cache`] module layers retries and freshness on top of a source.
//!
pub mod cache;

use std::fmt::{Display, Formatter};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::model::User;

/// Public mock API serving the directory.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a directory fetch failed. A fetch is all-or-nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    Transport(String),
    /// Server answered with a non-2xx status.
    Status(u16),
    /// Body was not a JSON array of users.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "request failed: {msg}"),
            FetchError::Status(code) => write!(f, "server returned HTTP {code}"),
            FetchError::Decode(msg) => write!(f, "invalid response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Anything able to produce the full user list.
pub trait UserSource: Send + Sync + 'static {
    fn fetch_users(&self) -> Result<Vec<User>, FetchError>;
}

/// reqwest-backed source for `GET {endpoint}/users`.
pub struct HttpUserSource {
    client: Client,
    url: String,
}

impl HttpUserSource {
    /// Build a source with an explicit request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            url: users_url(endpoint),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl UserSource for HttpUserSource {
    fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        tracing::debug!(url = %self.url, "GET users");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.json::<Vec<User>>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn users_url(endpoint: &str) -> String {
    format!("{}/users", endpoint.trim_end_matches('/'))
}
