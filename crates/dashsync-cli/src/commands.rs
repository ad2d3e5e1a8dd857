//! Command implementations.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};

use dashsync::core::settings::keys;
use dashsync::core::{mask_secret, VerdictResponse};
use dashsync::source::{GitHubContentsClient, NerdGraphClient};
use dashsync::store::{SettingsStore, SettingsStoreExt, SqliteSettingsStore};
use dashsync::{spawn_poller, DashSync, DashSyncConfig, DashboardGuid, SyncVerdict};

use crate::cli::SettingsAction;

type Service = DashSync<SqliteSettingsStore, NerdGraphClient, GitHubContentsClient>;

/// Exit status for an out-of-sync dashboard.
const EXIT_OUT_OF_SYNC: u8 = 1;
/// Exit status for a failed check or commit.
const EXIT_ERROR: u8 = 2;

pub fn open_store(path: &std::path::Path) -> Result<SqliteSettingsStore> {
    SqliteSettingsStore::open(path)
        .with_context(|| format!("failed to open settings database {}", path.display()))
}

fn open_service(store: SqliteSettingsStore, config: DashSyncConfig) -> Result<Service> {
    DashSync::with_http(store, config).context("failed to set up HTTP clients")
}

fn parse_dashboard(input: &str) -> Result<DashboardGuid> {
    DashboardGuid::from_guid_or_url(input)
        .with_context(|| format!("not a dashboard GUID or dashboard URL: {input}"))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

pub async fn run_settings(store: &SqliteSettingsStore, action: SettingsAction) -> Result<ExitCode> {
    match action {
        SettingsAction::Show => {
            let settings = store.load().await?;
            for key in keys::ALL {
                let value = settings.get(key).unwrap_or_default();
                let shown = if value.is_empty() {
                    "(unset)".to_owned()
                } else if keys::SECRETS.contains(&key) {
                    mask_secret(value)
                } else {
                    value.to_owned()
                };
                println!("{key:<10} {shown}");
            }
            let missing = settings.missing_fields();
            if !missing.is_empty() {
                println!();
                println!("missing: {}", missing.join(", "));
            }
        }
        SettingsAction::Set { key, value } => {
            store.set(&key, &value).await?;
            tracing::info!(%key, "setting stored");
        }
        SettingsAction::Unset { key } => {
            store.remove(&key).await?;
            tracing::info!(%key, "setting removed");
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ─────────────────────────────────────────────────────────────────────────────
// Compare / Commit / Watch
// ─────────────────────────────────────────────────────────────────────────────

pub async fn run_compare(
    store: SqliteSettingsStore,
    config: DashSyncConfig,
    dashboard: &str,
) -> Result<ExitCode> {
    let guid = parse_dashboard(dashboard)?;
    let service = open_service(store, config)?;

    let (verdict, divergence) = match service.try_compare(&guid).await {
        Ok(report) => (report.verdict(), report.divergence),
        Err(err) => (SyncVerdict::error(err.to_string()), None),
    };
    print_json(&VerdictResponse::from(verdict.clone()))?;
    if let Some(divergence) = divergence {
        eprintln!("first difference: {divergence}");
    }

    Ok(match verdict {
        SyncVerdict::InSync => ExitCode::SUCCESS,
        SyncVerdict::OutOfSync => ExitCode::from(EXIT_OUT_OF_SYNC),
        SyncVerdict::Error(_) => ExitCode::from(EXIT_ERROR),
    })
}

pub async fn run_commit(
    store: SqliteSettingsStore,
    config: DashSyncConfig,
    dashboard: &str,
) -> Result<ExitCode> {
    let guid = parse_dashboard(dashboard)?;
    let service = open_service(store, config)?;

    let response = service.commit(&guid).await;
    print_json(&response)?;
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_ERROR)
    })
}

pub async fn run_watch(
    store: SqliteSettingsStore,
    config: DashSyncConfig,
    dashboard: &str,
) -> Result<ExitCode> {
    let guid = parse_dashboard(dashboard)?;
    let service = Arc::new(open_service(store, config)?);
    let interval = service.poll_interval();
    tracing::info!(%guid, interval_secs = interval.as_secs(), "watching dashboard");

    let mut poller = spawn_poller(service, guid, interval);
    loop {
        tokio::select! {
            event = poller.next() => match event {
                Some(event) => print_json(&VerdictResponse::from(event.verdict))?,
                None => break,
            },
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for interrupt")?;
                break;
            }
        }
    }
    poller.stop();
    Ok(ExitCode::SUCCESS)
}
