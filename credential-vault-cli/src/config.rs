//! 配置文件加载
//!
//! `config.toml` lives in the platform config dir unless `--config` points elsewhere.
//! A missing default file is not an error; a missing explicit one is.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "credential-vault";

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `SQLite` database file, defaults to `<data dir>/credential-vault/vault.db`.
    pub database_path: Option<PathBuf>,
    /// Authenticated user. Without one every command is rejected.
    pub user_id: Option<i64>,
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl CliConfig {
    /// `<config dir>/credential-vault/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load from `explicit`, or from the default location when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Command-line flags win over file values.
    #[must_use]
    pub fn with_overrides(mut self, database_path: Option<PathBuf>, user_id: Option<i64>) -> Self {
        if database_path.is_some() {
            self.database_path = database_path;
        }
        if user_id.is_some() {
            self.user_id = user_id;
        }
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("vault.db")
        })
    }
}
