//! Error types for remote sources.

use std::fmt;

use thiserror::Error;

/// Which remote a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The monitoring API (live dashboard).
    Monitoring,
    /// The repository contents API (stored definition).
    Repository,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Monitoring => f.write_str("monitoring"),
            SourceKind::Repository => f.write_str("repository"),
        }
    }
}

/// Errors raised while fetching or writing a remote document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("{origin} request failed: {message}")]
    Transport { origin: SourceKind, message: String },

    /// Non-2xx response.
    #[error("{origin} responded with HTTP {status}: {body}")]
    Status {
        origin: SourceKind,
        status: u16,
        body: String,
    },

    /// The remote answered but reported an error in the response body.
    #[error("{origin} reported an error: {message}")]
    Remote { origin: SourceKind, message: String },

    /// Response body is not valid JSON.
    #[error("invalid JSON from {origin}: {message}")]
    Parse { origin: SourceKind, message: String },

    /// The identifier did not resolve to a dashboard.
    #[error("{origin} returned no dashboard entity for {guid}")]
    MissingEntity { origin: SourceKind, guid: String },

    /// The HTTP client or request URL could not be built.
    #[error("invalid {origin} client configuration: {message}")]
    Client { origin: SourceKind, message: String },
}

impl FetchError {
    /// The remote this error came from.
    pub fn origin(&self) -> SourceKind {
        match self {
            FetchError::Transport { origin, .. }
            | FetchError::Status { origin, .. }
            | FetchError::Remote { origin, .. }
            | FetchError::Parse { origin, .. }
            | FetchError::MissingEntity { origin, .. }
            | FetchError::Client { origin, .. } => *origin,
        }
    }

    /// HTTP status, if the error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_source() {
        let err = FetchError::Parse {
            origin: SourceKind::Repository,
            message: "expected value at line 1 column 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid JSON from repository: expected value at line 1 column 1"
        );
        assert_eq!(err.origin(), SourceKind::Repository);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_status_accessor() {
        let err = FetchError::Status {
            origin: SourceKind::Monitoring,
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "monitoring responded with HTTP 401: unauthorized");
    }
}
