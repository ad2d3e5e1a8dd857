//! # Dashsync Sync
//!
//! The comparison pipeline and the typed request channel.
//!
//! ## Overview
//!
//! [`Orchestrator`] fetches the live dashboard and the repository copy,
//! canonicalizes both, and compares them structurally. Every failure is
//! folded into an error verdict; nothing propagates past the orchestrator.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashsync_core::{DashboardGuid, Settings};
//! use dashsync_source::{GitHubContentsClient, HttpConfig, NerdGraphClient};
//! use dashsync_sync::{Orchestrator, SyncConfig};
//!
//! # async fn example(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
//! let http = HttpConfig::default();
//! let orchestrator = Orchestrator::new(
//!     NerdGraphClient::new(&http)?,
//!     GitHubContentsClient::new(&http)?,
//!     SyncConfig::default(),
//! );
//!
//! let guid = DashboardGuid::parse("MXxWSVp8REFTSEJPQVJEfDE")?;
//! let verdict = orchestrator.compare(&guid, &settings).await;
//! println!("{verdict}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Request Flow
//!
//! ```text
//! SyncClient --SyncRequest--> serve() --spawn--> RequestHandler
//!     ^                                               |
//!     +----------------- SyncResponse (oneshot) ------+
//! ```

pub mod error;
pub mod messages;
pub mod protocol;
pub mod transport;

pub use error::{Result, SyncError};
pub use messages::{CommitResponse, SyncRequest, SyncResponse};
pub use protocol::{commit_message, CommitReport, ComparisonReport, Orchestrator, SyncConfig};
pub use transport::{channel, serve, RequestHandler, SyncClient, SyncInbox};
