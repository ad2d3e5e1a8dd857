//! Shared HTTP client configuration.

use std::time::Duration;

use crate::error::{FetchError, Result, SourceKind};

/// Default `User-Agent`, required by the repository API.
pub const DEFAULT_USER_AGENT: &str = concat!("dashsync/", env!("CARGO_PKG_VERSION"));

/// HTTP settings applied to every remote source.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout, connect through body.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpConfig {
    pub(crate) fn build_client(&self, origin: SourceKind) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client {
                origin,
                message: e.to_string(),
            })
    }
}

/// Map a reqwest failure into a transport error.
pub(crate) fn transport_error(origin: SourceKind, err: reqwest::Error) -> FetchError {
    let message = if err.is_timeout() {
        "request timed out".to_owned()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    FetchError::Transport { origin, message }
}
