//! Command-line interface using clap derive macros.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use credential_vault_core::types::{
    AccountType, CredentialFields, CredentialStatus, CredentialUpdate,
};

pub use commands::execute;

/// Credential Vault: store, search and audit your account credentials.
#[derive(Parser, Debug)]
#[command(name = "credential-vault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: `<config dir>/credential-vault/config.toml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the config file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Acting user id, overrides the config file.
    #[arg(long, global = true)]
    pub user: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a new credential.
    Add(AddArgs),

    /// Change fields of a stored credential.
    Edit(EditArgs),

    /// Delete one or more credentials.
    Delete {
        /// Credential ids.
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// List credentials matching a query, most recently changed first.
    Search {
        /// Case-insensitive text; lists everything when omitted.
        #[arg(default_value = "")]
        query: String,

        /// Only this account type (all when omitted).
        #[arg(long = "type")]
        account_type: Option<AccountType>,

        /// Only this status (all when omitted).
        #[arg(long)]
        status: Option<CredentialStatus>,
    },

    /// Import credentials from a CSV file.
    Import {
        file: PathBuf,
    },

    /// Export all credentials as CSV.
    Export {
        /// Output file (stdout when omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show password strength, freshness and status metrics.
    Health,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub platform: String,

    #[arg(long)]
    pub username: String,

    /// Visible in shell history; prefer importing from a file for bulk entry.
    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub account_identity: String,

    /// `#1-TopPriority` .. `#6-Entertainment`
    #[arg(long, default_value_t = AccountType::default())]
    pub account_type: AccountType,

    /// `Active`, `Inactive`, `Suspended` or `Archived`
    #[arg(long, default_value_t = CredentialStatus::default())]
    pub status: CredentialStatus,

    #[arg(long)]
    pub account_name: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub special_pin: Option<String>,

    #[arg(long)]
    pub recovery_number: Option<String>,

    #[arg(long)]
    pub recovery_email: Option<String>,
}

impl From<AddArgs> for CredentialFields {
    fn from(args: AddArgs) -> Self {
        Self {
            platform: args.platform,
            account_name: args.account_name,
            url: args.url,
            username: args.username,
            password: args.password,
            account_identity: args.account_identity,
            account_type: args.account_type,
            status: args.status,
            special_pin: args.special_pin,
            recovery_number: args.recovery_number,
            recovery_email: args.recovery_email,
        }
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Credential id.
    pub id: i64,

    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub account_identity: Option<String>,

    #[arg(long)]
    pub account_type: Option<AccountType>,

    #[arg(long)]
    pub status: Option<CredentialStatus>,

    #[arg(long, conflicts_with = "clear_account_name")]
    pub account_name: Option<String>,

    #[arg(long)]
    pub clear_account_name: bool,

    #[arg(long, conflicts_with = "clear_url")]
    pub url: Option<String>,

    #[arg(long)]
    pub clear_url: bool,

    #[arg(long, conflicts_with = "clear_special_pin")]
    pub special_pin: Option<String>,

    #[arg(long)]
    pub clear_special_pin: bool,

    #[arg(long, conflicts_with = "clear_recovery_number")]
    pub recovery_number: Option<String>,

    #[arg(long)]
    pub clear_recovery_number: bool,

    #[arg(long, conflicts_with = "clear_recovery_email")]
    pub recovery_email: Option<String>,

    #[arg(long)]
    pub clear_recovery_email: bool,
}

/// Flag pair to tri-state: `--clear-x` clears, `--x v` sets, neither keeps.
fn tri_state(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

impl EditArgs {
    pub fn into_update(self) -> (i64, CredentialUpdate) {
        let update = CredentialUpdate {
            platform: self.platform,
            account_name: tri_state(self.account_name, self.clear_account_name),
            url: tri_state(self.url, self.clear_url),
            username: self.username,
            password: self.password,
            account_identity: self.account_identity,
            account_type: self.account_type,
            status: self.status,
            special_pin: tri_state(self.special_pin, self.clear_special_pin),
            recovery_number: tri_state(self.recovery_number, self.clear_recovery_number),
            recovery_email: tri_state(self.recovery_email, self.clear_recovery_email),
        };
        (self.id, update)
    }
}
