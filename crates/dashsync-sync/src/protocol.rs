//! Comparison and commit pipeline.
//!
//! A comparison runs: validate settings, fetch both documents, canonicalize
//! each with its volatile-key set, compare. Every failure becomes an error
//! verdict at this boundary.

use serde_json::Value;

use dashsync_core::{
    canonicalize, first_divergence, DashboardGuid, Digest, Divergence, RepoLocation, Settings,
    SyncVerdict, VolatileKeys,
};
use dashsync_source::{CommitOutcome, FileCommit, MonitoringSource, RepositorySource};

use crate::error::{Result, SyncError};
use crate::messages::{CommitResponse, SyncRequest, SyncResponse};

/// Configuration for the comparison pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Fetch both documents at once. When false the repository is only
    /// fetched after the live dashboard arrived.
    pub concurrent_fetch: bool,
    /// Keys stripped from the repository document before comparison.
    pub repository_volatile_keys: VolatileKeys,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrent_fetch: true,
            repository_volatile_keys: VolatileKeys::repository(),
        }
    }
}

/// Details of one successful comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub guid: DashboardGuid,
    pub location: RepoLocation,
    /// Digest of the canonical live document.
    pub live_digest: Digest,
    /// Digest of the canonical repository document.
    pub stored_digest: Digest,
    /// First structural difference, live side on the left.
    pub divergence: Option<Divergence>,
}

impl ComparisonReport {
    pub fn in_sync(&self) -> bool {
        self.divergence.is_none()
    }

    pub fn verdict(&self) -> SyncVerdict {
        if self.in_sync() {
            SyncVerdict::InSync
        } else {
            SyncVerdict::OutOfSync
        }
    }
}

/// Details of one successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    pub guid: DashboardGuid,
    pub location: RepoLocation,
    /// Digest of the committed canonical document.
    pub digest: Digest,
    pub outcome: CommitOutcome,
}

impl CommitReport {
    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let verb = if self.outcome.created { "Created" } else { "Updated" };
        match &self.outcome.commit_sha {
            Some(sha) => format!("{verb} {} in commit {sha}", self.location),
            None => format!("{verb} {}", self.location),
        }
    }
}

/// Commit message for a dashboard sync.
pub fn commit_message(guid: &DashboardGuid, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Sync dashboard \"{name}\" ({guid})"),
        None => format!("Sync dashboard {guid}"),
    }
}

/// Runs comparisons and commits against a pair of sources.
///
/// Holds no per-request state; overlapping calls are independent.
pub struct Orchestrator<M, R> {
    monitoring: M,
    repository: R,
    config: SyncConfig,
}

impl<M: MonitoringSource, R: RepositorySource> Orchestrator<M, R> {
    pub fn new(monitoring: M, repository: R, config: SyncConfig) -> Self {
        Self {
            monitoring,
            repository,
            config,
        }
    }

    pub fn monitoring(&self) -> &M {
        &self.monitoring
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Compare the live dashboard with the repository copy.
    pub async fn compare(&self, guid: &DashboardGuid, settings: &Settings) -> SyncVerdict {
        match self.try_compare(guid, settings).await {
            Ok(report) => report.verdict(),
            Err(err) => {
                tracing::warn!(%guid, error = %err, "comparison failed");
                SyncVerdict::Error(err.to_string())
            }
        }
    }

    /// Compare, keeping the failure type and the comparison details.
    pub async fn try_compare(
        &self,
        guid: &DashboardGuid,
        settings: &Settings,
    ) -> Result<ComparisonReport> {
        settings.validate()?;
        let location = settings.repo_location();
        tracing::debug!(%guid, %location, concurrent = self.config.concurrent_fetch, "comparing dashboard");

        let (live, stored) = self.fetch_both(guid, settings, &location).await?;

        let live = canonicalize(&live, &VolatileKeys::none());
        let stored = canonicalize(&stored, &self.config.repository_volatile_keys);

        let divergence = if live.matches(&stored) {
            None
        } else {
            let divergence = first_divergence(live.as_value(), stored.as_value());
            if divergence.is_none() {
                return Err(SyncError::Comparison(
                    "documents differ but no divergence was found".into(),
                ));
            }
            divergence
        };

        let report = ComparisonReport {
            guid: guid.clone(),
            location,
            live_digest: live.digest(),
            stored_digest: stored.digest(),
            divergence,
        };
        match &report.divergence {
            None => tracing::info!(
                %guid,
                digest = %report.live_digest.short(),
                "dashboard in sync"
            ),
            Some(divergence) => tracing::info!(
                %guid,
                live = %report.live_digest.short(),
                stored = %report.stored_digest.short(),
                %divergence,
                "dashboard out of sync"
            ),
        }
        Ok(report)
    }

    async fn fetch_both(
        &self,
        guid: &DashboardGuid,
        settings: &Settings,
        location: &RepoLocation,
    ) -> Result<(Value, Value)> {
        let live = self.monitoring.fetch_dashboard(guid, settings.api_key.trim());
        let stored = self.repository.fetch_file(location, settings.repo_token.trim());

        if self.config.concurrent_fetch {
            let (live, stored) = tokio::join!(live, stored);
            // Monitoring failure is reported first when both fail.
            Ok((live?, stored?))
        } else {
            let live = live.await?;
            let stored = stored.await?;
            Ok((live, stored))
        }
    }

    /// Write the live dashboard into the repository.
    pub async fn commit(&self, guid: &DashboardGuid, settings: &Settings) -> CommitResponse {
        match self.try_commit(guid, settings).await {
            Ok(report) => CommitResponse::Success {
                message: report.summary(),
            },
            Err(err) => {
                tracing::warn!(%guid, error = %err, "commit failed");
                CommitResponse::Error {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Commit, keeping the failure type and the commit details.
    pub async fn try_commit(
        &self,
        guid: &DashboardGuid,
        settings: &Settings,
    ) -> Result<CommitReport> {
        settings.validate()?;
        let location = settings.repo_location();

        let live = self
            .monitoring
            .fetch_dashboard(guid, settings.api_key.trim())
            .await?;
        let document = canonicalize(&live, &VolatileKeys::none());
        let commit = FileCommit {
            message: commit_message(guid, document.name()),
            content: document.to_pretty_string(),
        };

        let outcome = self
            .repository
            .commit_file(&location, settings.repo_token.trim(), &commit)
            .await?;

        let report = CommitReport {
            guid: guid.clone(),
            location,
            digest: document.digest(),
            outcome,
        };
        tracing::info!(
            %guid,
            location = %report.location,
            digest = %report.digest.short(),
            created = report.outcome.created,
            "dashboard committed"
        );
        Ok(report)
    }

    /// Serve one request with the given settings.
    pub async fn handle(&self, request: &SyncRequest, settings: &Settings) -> SyncResponse {
        match request {
            SyncRequest::CompareDashboards { guid } => self.compare(guid, settings).await.into(),
            SyncRequest::CommitDashboard { guid } => self.commit(guid, settings).await.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashsync_core::{DivergenceKind, Side};
    use dashsync_source::{
        FetchError, MemoryMonitoringSource, MemoryRepositorySource, Scripted, SourceKind,
    };
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    const PATH: &str = "dashboards/overview.json";

    fn guid() -> DashboardGuid {
        DashboardGuid::parse("MXxWSVp8REFTSEJPQVJEfDE").unwrap()
    }

    fn settings() -> Settings {
        Settings {
            api_key: "NRAK-TESTKEY000000".into(),
            repo_token: "ghp_testtoken000000".into(),
            repo_owner: "acme".into(),
            repo_name: "dashboards".into(),
            branch: "main".into(),
            file_path: PATH.into(),
        }
    }

    fn orchestrator(
        live: impl Into<Scripted>,
        stored: impl Into<Scripted>,
    ) -> Orchestrator<MemoryMonitoringSource, MemoryRepositorySource> {
        Orchestrator::new(
            MemoryMonitoringSource::new().with_dashboard(guid(), live),
            MemoryRepositorySource::new().with_file(PATH, stored),
            SyncConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_in_sync_despite_key_order_and_volatile_keys() {
        let orch = orchestrator(
            json!({"name": "D", "pages": [{"title": "A", "id": 1}]}),
            json!({"pages": [{"id": 1, "title": "A"}], "name": "D", "linkedEntityGuids": ["x"]}),
        );
        assert_eq!(orch.compare(&guid(), &settings()).await, SyncVerdict::InSync);
        assert_eq!(orch.monitoring().calls(), 1);
        assert_eq!(orch.repository().calls(), 1);
    }

    #[tokio::test]
    async fn test_out_of_sync_reports_divergence() {
        let orch = orchestrator(json!({"name": "D2"}), json!({"name": "D"}));
        let report = orch.try_compare(&guid(), &settings()).await.unwrap();

        assert_eq!(report.verdict(), SyncVerdict::OutOfSync);
        assert_ne!(report.live_digest, report.stored_digest);
        let divergence = report.divergence.unwrap();
        assert_eq!(divergence.pointer, "/name");
        assert_eq!(divergence.kind, DivergenceKind::ValueMismatch);
    }

    #[tokio::test]
    async fn test_missing_settings_make_no_calls() {
        let orch = orchestrator(json!({}), json!({}));
        let mut settings = settings();
        settings.api_key.clear();

        let verdict = orch.compare(&guid(), &settings).await;
        assert_eq!(
            verdict,
            SyncVerdict::error("settings not configured: missing apiKey")
        );
        assert_eq!(orch.monitoring().calls(), 0);
        assert_eq!(orch.repository().calls(), 0);
    }

    #[tokio::test]
    async fn test_repository_root_path_is_not_configured() {
        let orch = orchestrator(json!({}), json!([{"name": "README.md", "type": "file"}]));
        let mut settings = settings();
        settings.file_path = "/".into();

        let verdict = orch.compare(&guid(), &settings).await;
        assert_eq!(
            verdict,
            SyncVerdict::error("settings not configured: missing filePath")
        );
        assert_eq!(orch.monitoring().calls(), 0);
        assert_eq!(orch.repository().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_fetches_overlap() {
        let delay = Duration::from_millis(100);
        let live = json!({"name": "D"});
        let orch = Orchestrator::new(
            MemoryMonitoringSource::new()
                .with_dashboard(guid(), live.clone())
                .with_delay(delay),
            MemoryRepositorySource::new()
                .with_file(PATH, live)
                .with_delay(delay),
            SyncConfig::default(),
        );

        let started = Instant::now();
        assert_eq!(orch.compare(&guid(), &settings()).await, SyncVerdict::InSync);
        let elapsed = started.elapsed();
        assert!(elapsed >= delay, "{elapsed:?}");
        assert!(elapsed < delay * 2, "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_fetches_add_up() {
        let delay = Duration::from_millis(100);
        let live = json!({"name": "D"});
        let orch = Orchestrator::new(
            MemoryMonitoringSource::new()
                .with_dashboard(guid(), live.clone())
                .with_delay(delay),
            MemoryRepositorySource::new()
                .with_file(PATH, live)
                .with_delay(delay),
            SyncConfig {
                concurrent_fetch: false,
                ..SyncConfig::default()
            },
        );

        let started = Instant::now();
        assert_eq!(orch.compare(&guid(), &settings()).await, SyncVerdict::InSync);
        assert!(started.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn test_unparseable_repository_file() {
        let orch = orchestrator(json!({"name": "D"}), Scripted::raw("{not json"));
        let verdict = orch.compare(&guid(), &settings()).await;
        let message = verdict.message().unwrap();
        assert!(message.starts_with("invalid JSON from repository"), "{message}");
    }

    #[tokio::test]
    async fn test_volatile_keys_only_scrubbed_from_repository() {
        let orch = orchestrator(
            json!({"name": "D", "linkedEntityGuids": ["x"]}),
            json!({"name": "D", "linkedEntityGuids": ["x"]}),
        );
        let report = orch.try_compare(&guid(), &settings()).await.unwrap();
        let divergence = report.divergence.unwrap();
        assert_eq!(divergence.pointer, "/linkedEntityGuids");
        assert_eq!(
            divergence.kind,
            DivergenceKind::MissingKey {
                missing_from: Side::Right
            }
        );
    }

    #[tokio::test]
    async fn test_monitoring_error_wins_when_both_fail() {
        let monitoring_err = FetchError::Remote {
            origin: SourceKind::Monitoring,
            message: "Invalid API key".into(),
        };
        let orch = Orchestrator::new(
            MemoryMonitoringSource::new().with_dashboard(guid(), monitoring_err.clone()),
            MemoryRepositorySource::new(),
            SyncConfig::default(),
        );
        let err = orch.try_compare(&guid(), &settings()).await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(e) if e == monitoring_err));
        assert_eq!(orch.repository().calls(), 1);
    }

    #[tokio::test]
    async fn test_sequential_fetch_stops_after_monitoring_failure() {
        let orch = Orchestrator::new(
            MemoryMonitoringSource::new(),
            MemoryRepositorySource::new().with_file(PATH, json!({})),
            SyncConfig {
                concurrent_fetch: false,
                ..SyncConfig::default()
            },
        );
        let verdict = orch.compare(&guid(), &settings()).await;
        assert!(verdict.is_error());
        assert_eq!(orch.monitoring().calls(), 1);
        assert_eq!(orch.repository().calls(), 0);
    }

    #[tokio::test]
    async fn test_numeric_formatting_does_not_matter() {
        let orch = orchestrator(
            json!({"layout": {"width": 4, "height": 3}}),
            Scripted::raw(r#"{"layout": {"height": 3.0, "width": 4.0}}"#),
        );
        assert_eq!(orch.compare(&guid(), &settings()).await, SyncVerdict::InSync);
    }

    #[tokio::test]
    async fn test_commit_writes_canonical_live_document() {
        let orch = orchestrator(json!({"pages": [], "name": "Overview"}), json!({}));
        let report = orch.try_commit(&guid(), &settings()).await.unwrap();
        assert!(!report.outcome.created);

        let commits = orch.repository().commits();
        assert_eq!(commits.len(), 1);
        let (location, commit) = &commits[0];
        assert_eq!(location.path, PATH);
        assert_eq!(
            commit.message,
            "Sync dashboard \"Overview\" (MXxWSVp8REFTSEJPQVJEfDE)"
        );
        assert_eq!(commit.content, "{\n  \"name\": \"Overview\",\n  \"pages\": []\n}\n");

        // The committed file compares in sync afterwards.
        assert_eq!(orch.compare(&guid(), &settings()).await, SyncVerdict::InSync);
    }

    #[tokio::test]
    async fn test_commit_failure_response() {
        let orch = Orchestrator::new(
            MemoryMonitoringSource::new(),
            MemoryRepositorySource::new(),
            SyncConfig::default(),
        );
        let response = orch.commit(&guid(), &settings()).await;
        assert!(!response.is_success());
        assert!(response.message().contains("no dashboard entity"));
        assert!(orch.repository().commits().is_empty());
    }

    #[tokio::test]
    async fn test_handle_dispatches_by_action() {
        let orch = orchestrator(json!({"name": "D"}), json!({"name": "D"}));
        let response = orch.handle(&SyncRequest::compare(guid()), &settings()).await;
        assert_eq!(response.verdict(), Some(SyncVerdict::InSync));

        let response = orch.handle(&SyncRequest::commit(guid()), &settings()).await;
        assert!(matches!(response, SyncResponse::Commit(CommitResponse::Success { .. })));
    }

    #[test]
    fn test_commit_message_without_name() {
        assert_eq!(
            commit_message(&guid(), None),
            "Sync dashboard MXxWSVp8REFTSEJPQVJEfDE"
        );
    }
}
