//! CLI command handlers
//!
//! Each handler calls one service and prints its result to stdout as JSON
//! (CSV for `export`). Logs and reports go to stderr.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;

use credential_vault_app::AppState;
use credential_vault_core::types::{
    AuthContext, BatchDeleteRequest, CredentialFields, CredentialQuery,
};

use super::Commands;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the parsed CLI command.
pub async fn execute(state: &AppState, auth: &AuthContext, command: Commands) -> Result<()> {
    match command {
        Commands::Add(args) => cmd_add(state, auth, args.into()).await,
        Commands::Edit(args) => {
            let (id, update) = args.into_update();
            if update.is_empty() {
                bail!("Nothing to change: pass at least one field flag");
            }
            let updated = state.credential_service.update(auth, id, update).await?;
            print_json(&updated)
        }
        Commands::Delete { ids } => cmd_delete(state, auth, ids).await,
        Commands::Search {
            query,
            account_type,
            status,
        } => {
            let query = CredentialQuery::text(query)
                .with_account_type(account_type)
                .with_status(status);
            let found = state.credential_service.query(auth, &query).await?;
            print_json(&found)
        }
        Commands::Import { file } => cmd_import(state, auth, &file).await,
        Commands::Export { output } => cmd_export(state, auth, output.as_deref()).await,
        Commands::Health => {
            let report = state.health_service.report(auth, Utc::now()).await?;
            print_json(&report)
        }
    }
}

async fn cmd_add(state: &AppState, auth: &AuthContext, fields: CredentialFields) -> Result<()> {
    let created = state.credential_service.create(auth, fields).await?;
    print_json(&created)
}

async fn cmd_delete(state: &AppState, auth: &AuthContext, ids: Vec<i64>) -> Result<()> {
    if let [id] = ids.as_slice() {
        state.credential_service.delete(auth, *id).await?;
        tracing::info!("Deleted credential {id}");
        return Ok(());
    }

    let result = state
        .credential_service
        .batch_delete(
            auth,
            BatchDeleteRequest {
                credential_ids: ids,
            },
        )
        .await?;
    print_json(&result)?;

    if result.failed_count > 0 {
        bail!("{} credential(s) could not be deleted", result.failed_count);
    }
    Ok(())
}

async fn cmd_import(state: &AppState, auth: &AuthContext, path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let result = state.import_export_service.import_csv(auth, file).await?;
    if !result.error_report.is_empty() {
        eprintln!("{}", result.error_report);
    }
    print_json(&result)
}

async fn cmd_export(state: &AppState, auth: &AuthContext, output: Option<&Path>) -> Result<()> {
    let export = state.import_export_service.export_csv(auth).await?;

    match output {
        Some(path) => {
            std::fs::write(path, &export.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Exported {} credential(s) to {}",
                export.record_count,
                path.display()
            );
        }
        None => print!("{}", export.content),
    }
    Ok(())
}
