//! # Dashsync Source
//!
//! Remote document sources: the live dashboard from New Relic NerdGraph and
//! the stored definition from the GitHub contents API.
//!
//! ## Key Types
//!
//! - [`MonitoringSource`] / [`RepositorySource`] - The traits the orchestrator depends on
//! - [`NerdGraphClient`] - reqwest-backed monitoring source
//! - [`GitHubContentsClient`] - reqwest-backed repository source
//! - [`MemoryMonitoringSource`] / [`MemoryRepositorySource`] - Scripted sources for tests
//! - [`FetchError`] - Transport, status, remote, parse and missing-entity failures
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashsync_core::DashboardGuid;
//! use dashsync_source::{HttpConfig, MonitoringSource, NerdGraphClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NerdGraphClient::new(&HttpConfig::default())?;
//! let guid = DashboardGuid::parse("MXxWSVp8REFTSEJPQVJEfDE")?;
//! let dashboard = client.fetch_dashboard(&guid, "NRAK-...").await?;
//! println!("{}", dashboard["name"]);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod github;
pub mod http;
pub mod memory;
pub mod newrelic;
pub mod traits;

pub use document::parse_document;
pub use error::{FetchError, Result, SourceKind};
pub use github::GitHubContentsClient;
pub use http::HttpConfig;
pub use memory::{MemoryMonitoringSource, MemoryRepositorySource, Scripted};
pub use newrelic::NerdGraphClient;
pub use traits::{CommitOutcome, FileCommit, MonitoringSource, RepositorySource};
