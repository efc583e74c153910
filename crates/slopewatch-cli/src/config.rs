//! Optional TOML configuration for the CLI.
//!
//! Precedence: command-line flags, then the config file, then defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "data/observations.json";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// JSON file holding the observation log.
    pub store_path: PathBuf,
    /// `tracing` filter directive used when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: AppConfig =
            toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
        if config.store_path.is_relative() {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                config.store_path = dir.join(&config.store_path);
            }
        }
        Ok(config)
    }

    /// Merge the optional config file with command-line overrides.
    pub fn resolve(
        file: Option<&Path>,
        store_path: Option<PathBuf>,
        verbose: u8,
    ) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(store_path) = store_path {
            config.store_path = store_path;
        }
        if verbose > 0 {
            config.log_filter = match verbose {
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
            .to_string();
        }
        Ok(config)
    }
}
