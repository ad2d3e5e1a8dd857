//! dashsync CLI
//!
//! Manage settings and check dashboards from the command line.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,dashsync=debug"
    } else {
        "warn,dashsync=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: tracing subscriber already set");
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.config();
    let store = commands::open_store(&cli.db)?;
    tracing::debug!(db = %cli.db.display(), "settings database opened");

    match cli.command {
        Commands::Settings { action } => commands::run_settings(&store, action).await,
        Commands::Compare { dashboard } => commands::run_compare(store, config, &dashboard).await,
        Commands::Commit { dashboard } => commands::run_commit(store, config, &dashboard).await,
        Commands::Watch { dashboard, .. } => commands::run_watch(store, config, &dashboard).await,
    }
}
