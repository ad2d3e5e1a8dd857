//! GitHub contents API client.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use dashsync_core::RepoLocation;

use crate::document::{excerpt, parse_document};
use crate::error::{FetchError, Result, SourceKind};
use crate::http::{transport_error, HttpConfig};
use crate::traits::{CommitOutcome, FileCommit, RepositorySource};

/// Public GitHub API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Media type returning the raw file content.
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Media type returning file metadata as JSON.
pub const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

const ORIGIN: SourceKind = SourceKind::Repository;

/// Reads and writes dashboard files through the contents API.
#[derive(Debug, Clone)]
pub struct GitHubContentsClient {
    api_base: Url,
    http: reqwest::Client,
}

impl GitHubContentsClient {
    /// Client for api.github.com.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Self::with_api_base(DEFAULT_API_BASE, config)
    }

    /// Client for another API base, e.g. GitHub Enterprise (`https://host/api/v3`).
    pub fn with_api_base(api_base: &str, config: &HttpConfig) -> Result<Self> {
        let api_base = Url::parse(api_base).map_err(|e| FetchError::Client {
            origin: ORIGIN,
            message: format!("invalid API base {api_base:?}: {e}"),
        })?;
        Ok(Self {
            api_base,
            http: config.build_client(ORIGIN)?,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn get(&self, url: Url, token: &str, accept: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            .header(reqwest::header::ACCEPT, accept)
    }

    /// Blob sha of the existing file, or `None` if there is none yet.
    async fn existing_sha(&self, location: &RepoLocation, token: &str) -> Result<Option<String>> {
        let mut url = contents_url(&self.api_base, location)?;
        url.query_pairs_mut().append_pair("ref", &location.branch);

        let response = self
            .get(url, token, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let metadata = parse_document(ORIGIN, &body)?;
        match metadata.get("sha").and_then(Value::as_str) {
            Some(sha) => Ok(Some(sha.to_owned())),
            None if metadata.is_array() => Err(FetchError::Remote {
                origin: ORIGIN,
                message: format!("{} is a directory", location.path),
            }),
            None => Err(FetchError::Remote {
                origin: ORIGIN,
                message: "file metadata has no sha".into(),
            }),
        }
    }
}

/// Contents API URL for a file. Each path segment is percent-encoded
/// on its own so `/` separators survive.
pub fn contents_url(api_base: &Url, location: &RepoLocation) -> Result<Url> {
    if location.path.split('/').all(|s| s.trim().is_empty()) {
        return Err(FetchError::Client {
            origin: ORIGIN,
            message: format!("no file path for {}/{}", location.owner, location.repo),
        });
    }
    let mut url = api_base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| FetchError::Client {
            origin: ORIGIN,
            message: format!("API base {api_base} cannot carry a path"),
        })?;
        segments
            .pop_if_empty()
            .extend(["repos", location.owner.as_str(), location.repo.as_str(), "contents"])
            .extend(location.path.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url)
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

fn status_error(status: StatusCode, body: &[u8]) -> FetchError {
    FetchError::Status {
        origin: ORIGIN,
        status: status.as_u16(),
        body: excerpt(body),
    }
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
}

#[async_trait]
impl RepositorySource for GitHubContentsClient {
    async fn fetch_file(&self, location: &RepoLocation, token: &str) -> Result<Value> {
        let mut url = contents_url(&self.api_base, location)?;
        url.query_pairs_mut().append_pair("ref", &location.branch);
        tracing::debug!(%location, "fetching repository file");

        let response = self
            .get(url, token, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        parse_document(ORIGIN, &body)
    }

    async fn commit_file(
        &self,
        location: &RepoLocation,
        token: &str,
        commit: &FileCommit,
    ) -> Result<CommitOutcome> {
        let sha = self.existing_sha(location, token).await?;
        tracing::debug!(%location, replacing = sha.is_some(), "writing repository file");

        let payload = PutContents {
            message: &commit.message,
            content: general_purpose::STANDARD.encode(commit.content.as_bytes()),
            branch: &location.branch,
            sha,
        };
        let response = self
            .http
            .put(contents_url(&self.api_base, location)?)
            .header(reqwest::header::AUTHORIZATION, format!("token {token}"))
            .header(reqwest::header::ACCEPT, JSON_MEDIA_TYPE)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        let reply = parse_document(ORIGIN, &body)?;
        Ok(CommitOutcome {
            created: status == StatusCode::CREATED,
            commit_sha: string_at(&reply, "/commit/sha"),
            content_sha: string_at(&reply, "/content/sha"),
        })
    }
}
