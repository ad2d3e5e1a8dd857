//! Scripted in-memory sources.
//!
//! Each source answers from a table of canned responses and counts its
//! invocations, so tests can assert how many remote calls a request made.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use dashsync_core::{DashboardGuid, RepoLocation};

use crate::document::parse_document;
use crate::error::{FetchError, Result, SourceKind};
use crate::traits::{CommitOutcome, FileCommit, MonitoringSource, RepositorySource};

/// A canned response.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// A parsed document.
    Document(Value),
    /// Raw body text, parsed on every fetch.
    Raw(Bytes),
    /// A failure.
    Fail(FetchError),
}

impl Scripted {
    pub fn raw(body: impl Into<Bytes>) -> Self {
        Self::Raw(body.into())
    }

    fn resolve(&self, origin: SourceKind) -> Result<Value> {
        match self {
            Scripted::Document(value) => Ok(value.clone()),
            Scripted::Raw(body) => parse_document(origin, body),
            Scripted::Fail(err) => Err(err.clone()),
        }
    }
}

impl From<Value> for Scripted {
    fn from(value: Value) -> Self {
        Self::Document(value)
    }
}

impl From<FetchError> for Scripted {
    fn from(err: FetchError) -> Self {
        Self::Fail(err)
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Monitoring
// ─────────────────────────────────────────────────────────────────────────────

/// Monitoring source answering from a GUID table.
#[derive(Debug, Default)]
pub struct MemoryMonitoringSource {
    dashboards: RwLock<HashMap<DashboardGuid, Scripted>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MemoryMonitoringSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dashboard(self, guid: DashboardGuid, response: impl Into<Scripted>) -> Self {
        self.set(guid, response);
        self
    }

    /// Delay every answer, e.g. to observe concurrent fetches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set(&self, guid: DashboardGuid, response: impl Into<Scripted>) {
        self.dashboards
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(guid, response.into());
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MonitoringSource for MemoryMonitoringSource {
    async fn fetch_dashboard(&self, guid: &DashboardGuid, _api_key: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;

        let scripted = self
            .dashboards
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(guid)
            .cloned();
        match scripted {
            Some(response) => response.resolve(SourceKind::Monitoring),
            None => Err(FetchError::MissingEntity {
                origin: SourceKind::Monitoring,
                guid: guid.to_string(),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository
// ─────────────────────────────────────────────────────────────────────────────

/// Repository source answering from a file-path table.
///
/// Commits are recorded and update the table, so a later fetch sees the
/// committed content.
#[derive(Debug, Default)]
pub struct MemoryRepositorySource {
    files: RwLock<HashMap<String, Scripted>>,
    commits: Mutex<Vec<(RepoLocation, FileCommit)>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MemoryRepositorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<String>, response: impl Into<Scripted>) -> Self {
        self.set(path, response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set(&self, path: impl Into<String>, response: impl Into<Scripted>) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), response.into());
    }

    /// Number of fetches and commits so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every commit made, oldest first.
    pub fn commits(&self) -> Vec<(RepoLocation, FileCommit)> {
        self.commits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl RepositorySource for MemoryRepositorySource {
    async fn fetch_file(&self, location: &RepoLocation, _token: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;

        let scripted = self
            .files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&location.path)
            .cloned();
        match scripted {
            Some(response) => response.resolve(SourceKind::Repository),
            None => Err(FetchError::Status {
                origin: SourceKind::Repository,
                status: 404,
                body: "Not Found".into(),
            }),
        }
    }

    async fn commit_file(
        &self,
        location: &RepoLocation,
        _token: &str,
        commit: &FileCommit,
    ) -> Result<CommitOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;

        let previous = self
            .files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(location.path.clone(), Scripted::raw(commit.content.clone()));

        let mut commits = self.commits.lock().unwrap_or_else(|e| e.into_inner());
        commits.push((location.clone(), commit.clone()));
        Ok(CommitOutcome {
            created: previous.is_none(),
            commit_sha: Some(format!("memory-{}", commits.len())),
            content_sha: None,
        })
    }
}
