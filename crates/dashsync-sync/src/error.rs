//! Error types for the sync module.

use thiserror::Error;

use dashsync_core::ConfigError;
use dashsync_source::FetchError;

/// Errors that can occur while serving a sync request.
///
/// The orchestrator turns every one of these into an error verdict; none
/// propagates past it.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required settings are missing. Raised before any fetch.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One of the remote fetches failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Internal inconsistency in the comparison pipeline.
    #[error("comparison failed: {0}")]
    Comparison(String),

    /// The request channel's server side has gone away.
    #[error("request channel closed")]
    ChannelClosed,
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
