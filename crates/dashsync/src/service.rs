//! The dashsync service: settings store plus orchestrator.

use std::time::Duration;

use async_trait::async_trait;

use dashsync_core::{DashboardGuid, Settings, SyncVerdict};
use dashsync_source::{
    github, newrelic, GitHubContentsClient, HttpConfig, MonitoringSource, NerdGraphClient,
    RepositorySource,
};
use dashsync_store::{SettingsStore, SettingsStoreExt};
use dashsync_sync::{
    CommitReport, CommitResponse, ComparisonReport, Orchestrator, RequestHandler, SyncConfig,
    SyncRequest, SyncResponse,
};

use crate::error::Result;
use crate::poller::DEFAULT_POLL_INTERVAL;

/// Configuration for the service.
#[derive(Debug, Clone)]
pub struct DashSyncConfig {
    /// NerdGraph endpoint.
    pub monitoring_endpoint: String,
    /// GitHub API base.
    pub repository_api_base: String,
    pub http: HttpConfig,
    pub sync: SyncConfig,
    /// Interval between background checks.
    pub poll_interval: Duration,
}

impl Default for DashSyncConfig {
    fn default() -> Self {
        Self {
            monitoring_endpoint: newrelic::DEFAULT_ENDPOINT.to_owned(),
            repository_api_base: github::DEFAULT_API_BASE.to_owned(),
            http: HttpConfig::default(),
            sync: SyncConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// The main service.
///
/// Settings are loaded from the store on every request, so a change made
/// through the store applies to the next check without a restart.
pub struct DashSync<S, M, R> {
    store: S,
    orchestrator: Orchestrator<M, R>,
    poll_interval: Duration,
}

impl<S: SettingsStore> DashSync<S, NerdGraphClient, GitHubContentsClient> {
    /// Service backed by the New Relic and GitHub HTTP APIs.
    pub fn with_http(store: S, config: DashSyncConfig) -> Result<Self> {
        let monitoring =
            NerdGraphClient::with_endpoint(config.monitoring_endpoint.clone(), &config.http)?;
        let repository =
            GitHubContentsClient::with_api_base(&config.repository_api_base, &config.http)?;
        Ok(Self::new(store, monitoring, repository, config))
    }
}

impl<S, M, R> DashSync<S, M, R>
where
    S: SettingsStore,
    M: MonitoringSource,
    R: RepositorySource,
{
    pub fn new(store: S, monitoring: M, repository: R, config: DashSyncConfig) -> Self {
        Self {
            store,
            orchestrator: Orchestrator::new(monitoring, repository, config.sync),
            poll_interval: config.poll_interval,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn orchestrator(&self) -> &Orchestrator<M, R> {
        &self.orchestrator
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Current settings record.
    pub async fn settings(&self) -> Result<Settings> {
        Ok(self.store.load().await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Comparison
    // ─────────────────────────────────────────────────────────────────────────

    /// Compare the live dashboard with the repository copy.
    pub async fn compare(&self, guid: &DashboardGuid) -> SyncVerdict {
        match self.store.load().await {
            Ok(settings) => self.orchestrator.compare(guid, &settings).await,
            Err(err) => {
                tracing::warn!(%guid, error = %err, "failed to load settings");
                SyncVerdict::error(format!("failed to load settings: {err}"))
            }
        }
    }

    pub async fn try_compare(&self, guid: &DashboardGuid) -> Result<ComparisonReport> {
        let settings = self.store.load().await?;
        Ok(self.orchestrator.try_compare(guid, &settings).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commit
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the live dashboard into the repository.
    pub async fn commit(&self, guid: &DashboardGuid) -> CommitResponse {
        match self.store.load().await {
            Ok(settings) => self.orchestrator.commit(guid, &settings).await,
            Err(err) => {
                tracing::warn!(%guid, error = %err, "failed to load settings");
                CommitResponse::Error {
                    message: format!("failed to load settings: {err}"),
                }
            }
        }
    }

    pub async fn try_commit(&self, guid: &DashboardGuid) -> Result<CommitReport> {
        let settings = self.store.load().await?;
        Ok(self.orchestrator.try_commit(guid, &settings).await?)
    }

    /// Answer one request.
    pub async fn respond(&self, request: &SyncRequest) -> SyncResponse {
        match request {
            SyncRequest::CompareDashboards { guid } => self.compare(guid).await.into(),
            SyncRequest::CommitDashboard { guid } => self.commit(guid).await.into(),
        }
    }
}

#[async_trait]
impl<S, M, R> RequestHandler for DashSync<S, M, R>
where
    S: SettingsStore + 'static,
    M: MonitoringSource + 'static,
    R: RepositorySource + 'static,
{
    async fn handle(&self, request: SyncRequest) -> SyncResponse {
        self.respond(&request).await
    }
}
