//! Error types for the dashsync service.

use dashsync_core::CoreError;
use dashsync_source::FetchError;
use dashsync_store::StoreError;
use dashsync_sync::SyncError;
use thiserror::Error;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum DashSyncError {
    /// Settings could not be read or written.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The comparison or commit pipeline failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// An HTTP source could not be built.
    #[error(transparent)]
    Source(#[from] FetchError),

    /// A dashboard reference did not parse.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, DashSyncError>;
