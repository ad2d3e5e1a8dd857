//! Comparison outcome and its wire representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tri-state result of one comparison request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncVerdict {
    /// Live dashboard matches the repository copy.
    InSync,
    /// Live dashboard differs from the repository copy.
    OutOfSync,
    /// The comparison could not be made; the message is shown verbatim.
    Error(String),
}

impl SyncVerdict {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_in_sync(&self) -> bool {
        matches!(self, Self::InSync)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Error message, if this is an error verdict.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for SyncVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InSync => f.write_str("in sync"),
            Self::OutOfSync => f.write_str("out of sync"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Wire form of a [`SyncVerdict`]:
/// `{"status":"success","inSync":bool}` or `{"status":"error","message":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VerdictResponse {
    Success {
        #[serde(rename = "inSync")]
        in_sync: bool,
    },
    Error {
        message: String,
    },
}

impl From<SyncVerdict> for VerdictResponse {
    fn from(verdict: SyncVerdict) -> Self {
        match verdict {
            SyncVerdict::InSync => Self::Success { in_sync: true },
            SyncVerdict::OutOfSync => Self::Success { in_sync: false },
            SyncVerdict::Error(message) => Self::Error { message },
        }
    }
}

impl From<VerdictResponse> for SyncVerdict {
    fn from(response: VerdictResponse) -> Self {
        match response {
            VerdictResponse::Success { in_sync: true } => Self::InSync,
            VerdictResponse::Success { in_sync: false } => Self::OutOfSync,
            VerdictResponse::Error { message } => Self::Error(message),
        }
    }
}
