use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::geo::Position;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://localhost:8000"
/// timeout_secs = 30
/// search_limit = 15
///
/// [home]
/// latitude = 52.52
/// longitude = 13.405
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the weather web app, without the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional `limit` for the search-history list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_limit: Option<u32>,

    /// Position reported by `locate` when no coordinates are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Position>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            search_limit: None,
            home: None,
        }
    }
}

impl ClientConfig {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_unchecked()?;
        cfg.validate().context("Invalid configuration; run `weather configure` to fix it")?;
        Ok(cfg)
    }

    /// Like [`ClientConfig::load`], but out-of-range values are kept so the
    /// file can still be edited.
    pub fn load_unchecked() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse and validate.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg = Self::parse(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-app", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(
                "Invalid base_url '{}': expected an http:// or https:// origin.",
                self.base_url
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be at least 1"));
        }
        if let Some(home) = self.home.filter(|p| !p.is_valid()) {
            return Err(anyhow!(
                "Invalid home position {home}: \
                 latitude must be -90 to 90, longitude must be -180 to 180"
            ));
        }
        Ok(())
    }

    /// Override the base URL, e.g. from a command-line flag.
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = url.into();
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
