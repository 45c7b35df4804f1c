//! Application configuration
//!
//! Loaded from a TOML file (`~/.config/recebimento/config.toml` unless
//! `--config` is given), then overridden by `RECEBIMENTO_*` environment
//! variables. Every setting has a default, so running without a file works.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "recebimento";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_WORKBOOK: &str = "modelo_recebimento.xlsx";

/// Environment variable names
pub mod env {
    pub const BACKEND: &str = "RECEBIMENTO_BACKEND";
    pub const PATH: &str = "RECEBIMENTO_PATH";
    pub const URL: &str = "RECEBIMENTO_URL";
    pub const LOG_LEVEL: &str = "RECEBIMENTO_LOG_LEVEL";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// env_logger filter used when `RUST_LOG` is not set
    pub log_level: Option<String>,
    pub storage: StorageConfig,
    pub tables: TablesConfig,
}

/// Which backend holds the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Directory of `<table>.csv` files
    #[default]
    Csv,
    /// Local `.xlsx` workbook, one sheet per table
    Xlsx,
    /// `.xlsx` workbook downloaded and uploaded over HTTP
    Http,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(BackendKind::Csv),
            "xlsx" => Ok(BackendKind::Xlsx),
            "http" => Ok(BackendKind::Http),
            other => bail!("Unknown storage backend '{}' (expected csv, xlsx or http)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// CSV directory or workbook file; defaults under the user data directory
    pub path: Option<PathBuf>,
    /// Workbook URL for the http backend
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: None,
            url: None,
            timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    /// Configured path, or the per-backend default
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(ref path) = self.path {
            return path.clone();
        }
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        match self.backend {
            BackendKind::Xlsx => data_dir.join(DEFAULT_WORKBOOK),
            BackendKind::Csv | BackendKind::Http => data_dir,
        }
    }
}

/// Table (sheet) names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    pub intake: String,
    pub materials: String,
    pub compatibility: String,
    pub locations: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            intake: "Recebimento".to_string(),
            materials: "Planilha3".to_string(),
            compatibility: "Compatibilidade".to_string(),
            locations: "Planilha1".to_string(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load from `path` (must exist) or the default location (may be absent),
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML")
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(backend) = var(env::BACKEND) {
            self.storage.backend = backend
                .parse()
                .with_context(|| format!("Invalid {}", env::BACKEND))?;
        }
        if let Some(path) = var(env::PATH).filter(|p| !p.is_empty()) {
            self.storage.path = Some(PathBuf::from(path));
        }
        if let Some(url) = var(env::URL).filter(|u| !u.is_empty()) {
            self.storage.url = Some(url);
        }
        if let Some(level) = var(env::LOG_LEVEL).filter(|l| !l.is_empty()) {
            self.log_level = Some(level);
        }
        Ok(())
    }
}
