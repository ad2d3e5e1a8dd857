//! User settings consumed by the sync pipeline.
//!
//! The record is persisted by a settings store and handed to the
//! orchestrator by value; the pipeline never writes it back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings key names, as used on the wire and in the settings store.
pub mod keys {
    pub const API_KEY: &str = "apiKey";
    pub const REPO_TOKEN: &str = "repoToken";
    pub const REPO_OWNER: &str = "repoOwner";
    pub const REPO_NAME: &str = "repoName";
    pub const BRANCH: &str = "branch";
    pub const FILE_PATH: &str = "filePath";

    /// Every key, in display order.
    pub const ALL: [&str; 6] = [API_KEY, REPO_TOKEN, REPO_OWNER, REPO_NAME, BRANCH, FILE_PATH];

    /// Keys whose values are credentials.
    pub const SECRETS: [&str; 2] = [API_KEY, REPO_TOKEN];
}

/// Credentials and repository coordinates.
///
/// Every field is required. An empty or whitespace-only value counts as
/// missing. Deserialization also accepts the key names used by the
/// browser-extension storage (`newRelicApiKey`, `githubPat`, ...).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Monitoring API user key.
    #[serde(default, alias = "newRelicApiKey")]
    pub api_key: String,
    /// Repository access token.
    #[serde(default, alias = "githubPat")]
    pub repo_token: String,
    #[serde(default, alias = "githubOwner")]
    pub repo_owner: String,
    #[serde(default, alias = "githubRepo")]
    pub repo_name: String,
    #[serde(default, alias = "githubBranch")]
    pub branch: String,
    /// Path of the dashboard file inside the repository.
    #[serde(default, alias = "githubDashboardPath")]
    pub file_path: String,
}

impl Settings {
    /// Value for a settings key, or `None` if the key is unknown.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            keys::API_KEY => &self.api_key,
            keys::REPO_TOKEN => &self.repo_token,
            keys::REPO_OWNER => &self.repo_owner,
            keys::REPO_NAME => &self.repo_name,
            keys::BRANCH => &self.branch,
            keys::FILE_PATH => &self.file_path,
            _ => return None,
        };
        Some(value)
    }

    /// Set a field by key name.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        let slot = match key {
            keys::API_KEY => &mut self.api_key,
            keys::REPO_TOKEN => &mut self.repo_token,
            keys::REPO_OWNER => &mut self.repo_owner,
            keys::REPO_NAME => &mut self.repo_name,
            keys::BRANCH => &mut self.branch,
            keys::FILE_PATH => &mut self.file_path,
            _ => return Err(ConfigError::UnknownKey(key.to_owned())),
        };
        *slot = value.into();
        Ok(())
    }

    /// Keys whose values are absent, in display order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        keys::ALL
            .into_iter()
            .filter(|key| self.get(key).map_or(true, |v| is_blank(key, v)))
            .collect()
    }

    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Ensure every required field is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured { missing })
        }
    }

    /// Where the dashboard file lives in the repository.
    pub fn repo_location(&self) -> RepoLocation {
        RepoLocation {
            owner: self.repo_owner.trim().to_owned(),
            repo: self.repo_name.trim().to_owned(),
            path: self.file_path.trim().trim_matches('/').to_owned(),
            branch: self.branch.trim().to_owned(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &mask_secret(&self.api_key))
            .field("repo_token", &mask_secret(&self.repo_token))
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("branch", &self.branch)
            .field("file_path", &self.file_path)
            .finish()
    }
}

/// A file path made only of slashes names the repository root, not a file.
fn is_blank(key: &str, value: &str) -> bool {
    let value = value.trim();
    if key == keys::FILE_PATH {
        value.trim_matches('/').trim().is_empty()
    } else {
        value.is_empty()
    }
}

/// Mask a credential, keeping the last four characters when long enough.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        String::new()
    } else if count <= 8 {
        "****".to_owned()
    } else {
        let tail: String = secret.chars().skip(count - 4).collect();
        format!("****{tail}")
    }
}

/// Coordinates of a file in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    /// Path inside the repository, without leading or trailing slashes.
    pub path: String,
    pub branch: String,
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}@{}", self.owner, self.repo, self.path, self.branch)
    }
}
