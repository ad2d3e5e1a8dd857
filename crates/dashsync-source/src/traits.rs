//! Source traits.
//!
//! The orchestrator depends on these traits only; the HTTP clients and the
//! scripted in-memory sources both implement them.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use dashsync_core::{DashboardGuid, RepoLocation};

use crate::error::Result;

/// Source of live dashboard definitions.
#[async_trait]
pub trait MonitoringSource: Send + Sync {
    /// Fetch the live definition of a dashboard.
    ///
    /// Returns the entity object exactly as the monitoring API reports it.
    async fn fetch_dashboard(&self, guid: &DashboardGuid, api_key: &str) -> Result<Value>;
}

/// Source of stored dashboard definitions.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetch and parse the JSON file at `location`.
    async fn fetch_file(&self, location: &RepoLocation, token: &str) -> Result<Value>;

    /// Create or replace the file at `location` on its branch.
    async fn commit_file(
        &self,
        location: &RepoLocation,
        token: &str,
        commit: &FileCommit,
    ) -> Result<CommitOutcome>;
}

/// A file write: commit message and full new file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    pub message: String,
    pub content: String,
}

/// Result of a successful file write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// True if the file did not exist before.
    pub created: bool,
    /// Sha of the new commit, when reported.
    pub commit_sha: Option<String>,
    /// Blob sha of the new file content, when reported.
    pub content_sha: Option<String>,
}

#[async_trait]
impl<M: MonitoringSource + ?Sized> MonitoringSource for Arc<M> {
    async fn fetch_dashboard(&self, guid: &DashboardGuid, api_key: &str) -> Result<Value> {
        (**self).fetch_dashboard(guid, api_key).await
    }
}

#[async_trait]
impl<R: RepositorySource + ?Sized> RepositorySource for Arc<R> {
    async fn fetch_file(&self, location: &RepoLocation, token: &str) -> Result<Value> {
        (**self).fetch_file(location, token).await
    }

    async fn commit_file(
        &self,
        location: &RepoLocation,
        token: &str,
        commit: &FileCommit,
    ) -> Result<CommitOutcome> {
        (**self).commit_file(location, token, commit).await
    }
}
