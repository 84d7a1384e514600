//! Configuration management for opsdeskd.
//!
//! Loads settings from /etc/opsdesk/config.toml (or the path in
//! OPSDESK_CONFIG) and falls back to defaults when the file is
//! missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/opsdesk/config.toml";

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "OPSDESK_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsdeskConfig {
    /// Address the HTTP API binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Root of the incident data tree (tickets.json, per-ticket dirs)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite database holding resolutions
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_listen_addr() -> String {
    // Localhost only; there is no authentication layer
    "127.0.0.1:7870".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("resolutions.db")
}

impl Default for OpsdeskConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            data_dir: default_data_dir(),
            db_path: default_db_path(),
        }
    }
}

impl OpsdeskConfig {
    /// Load the config, honoring OPSDESK_CONFIG. A missing file is
    /// normal and yields defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("Invalid config: {:?}", path))?;

        if !config.data_dir.exists() {
            warn!("Data directory {:?} does not exist yet", config.data_dir);
        }

        Ok(config)
    }
}
