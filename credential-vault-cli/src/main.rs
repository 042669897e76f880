//! Credential Vault command-line entry point
//!
//! Loads the config, opens the `SQLite` store, and runs one command as the
//! configured user. Data goes to stdout, logs to stderr.

mod cli;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use credential_vault_app::adapters::SqliteStore;
use credential_vault_app::AppStateBuilder;
use credential_vault_core::types::AuthContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use config::CliConfig;

const DEFAULT_LOG_FILTER: &str =
    "warn,credential_vault_core=info,credential_vault_app=info,credential_vault=info";

/// Logs to stderr. `RUST_LOG` wins over the configured filter. Records emitted
/// through the `log` facade by the library crates are captured as well.
fn init_tracing(filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_LOG_FILTER)));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(env_filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?.with_overrides(cli.db, cli.user);
    init_tracing(config.log_filter.as_deref());

    let db_path = config.database_path();
    tracing::debug!("Using database {}", db_path.display());

    let store = SqliteStore::new(&db_path).await?;
    let state = AppStateBuilder::new()
        .credential_repository(Arc::new(store))
        .build()?;

    let auth = AuthContext::from(config.user_id);
    if auth == AuthContext::Anonymous {
        tracing::warn!("No user configured; pass --user or set user_id in the config file");
    }

    cli::execute(&state, &auth, cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
