//! Error types for dashsync core.

use thiserror::Error;

/// Errors raised while parsing core identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid dashboard guid: {0:?}")]
    InvalidGuid(String),
}

/// Settings errors. Raised before any network access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more required settings are absent or blank.
    #[error("settings not configured: missing {}", .missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },

    #[error("unknown settings key: {0}")]
    UnknownKey(String),
}
