//! CLI argument parsing using clap derive

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use dashsync::source::{github, newrelic, HttpConfig};
use dashsync::sync::SyncConfig;
use dashsync::DashSyncConfig;

/// Compare a live New Relic dashboard with its copy in a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "dashsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings database
    #[arg(long, global = true, env = "DASHSYNC_DB", default_value = "dashsync.db")]
    pub db: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// NerdGraph endpoint (use https://api.eu.newrelic.com/graphql for EU accounts)
    #[arg(long, global = true, env = "DASHSYNC_NERDGRAPH_URL", default_value = newrelic::DEFAULT_ENDPOINT)]
    pub nerdgraph_url: String,

    /// GitHub API base
    #[arg(long, global = true, env = "DASHSYNC_GITHUB_API", default_value = github::DEFAULT_API_BASE)]
    pub github_api: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Fetch the repository file only after the live dashboard arrived
    #[arg(long, global = true)]
    pub sequential: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show or change the stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Compare a dashboard with the repository copy
    ///
    /// Prints the response JSON. Exit status: 0 in sync, 1 out of sync,
    /// 2 on error.
    Compare {
        /// Dashboard GUID or dashboard page URL
        dashboard: String,
    },

    /// Write the live dashboard into the repository
    Commit {
        /// Dashboard GUID or dashboard page URL
        dashboard: String,
    },

    /// Re-check a dashboard on an interval until interrupted
    Watch {
        /// Dashboard GUID or dashboard page URL
        dashboard: String,

        /// Seconds between checks
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print every setting, credentials masked
    Show,

    /// Store one setting
    ///
    /// Keys: apiKey, repoToken, repoOwner, repoName, branch, filePath
    Set { key: String, value: String },

    /// Delete one setting
    Unset { key: String },
}

impl Cli {
    /// Service configuration from the global flags.
    pub fn config(&self) -> DashSyncConfig {
        DashSyncConfig {
            monitoring_endpoint: self.nerdgraph_url.clone(),
            repository_api_base: self.github_api.clone(),
            http: HttpConfig {
                request_timeout: Duration::from_secs(self.timeout),
                ..HttpConfig::default()
            },
            sync: SyncConfig {
                concurrent_fetch: !self.sequential,
                ..SyncConfig::default()
            },
            poll_interval: match &self.command {
                Commands::Watch { interval, .. } => Duration::from_secs(*interval),
                _ => dashsync::DEFAULT_POLL_INTERVAL,
            },
        }
    }
}
