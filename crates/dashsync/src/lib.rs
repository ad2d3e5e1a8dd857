//! # Dashsync
//!
//! Check whether a live New Relic dashboard matches the JSON definition
//! stored in a GitHub repository, and push the live version when it does not.
//!
//! ## Overview
//!
//! - **Compare**: fetch both documents, canonicalize them (sorted keys,
//!   volatile keys dropped) and compare structurally
//! - **Commit**: write the canonical live document into the repository
//! - **Watch**: re-check the viewed dashboard on an interval
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashsync::{DashSync, DashSyncConfig, DashboardGuid};
//! use dashsync::store::SqliteSettingsStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteSettingsStore::open("dashsync.db")?;
//! let service = DashSync::with_http(store, DashSyncConfig::default())?;
//!
//! let guid = DashboardGuid::from_guid_or_url(
//!     "https://one.newrelic.com/dashboards/detail/MXxWSVp8REFTSEJPQVJEfDE",
//! )?;
//! println!("{}", service.compare(&guid).await);
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! - `dashsync::core` - Canonicalization, comparison, settings
//! - `dashsync::store` - Settings persistence
//! - `dashsync::source` - NerdGraph and GitHub clients
//! - `dashsync::sync` - Orchestrator and request channel

pub mod error;
pub mod poller;
pub mod service;
pub mod session;

pub use dashsync_core as core;
pub use dashsync_source as source;
pub use dashsync_store as store;
pub use dashsync_sync as sync;

pub use error::{DashSyncError, Result};
pub use poller::{spawn_poller, PollEvent, Poller, DEFAULT_POLL_INTERVAL};
pub use service::{DashSync, DashSyncConfig};
pub use session::{SessionChange, SessionState};

pub use dashsync_core::{DashboardGuid, Settings, SyncVerdict};
pub use dashsync_sync::{CommitResponse, SyncRequest, SyncResponse};
