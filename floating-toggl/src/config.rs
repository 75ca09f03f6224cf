use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::credential_store;
use crate::view_model::DEFAULT_DEBOUNCE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingConfig {
    /// Base URL of the Toggl v8 API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Quiet period after the last keystroke before suggestions are recomputed.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How often the running entry is polled. 0 disables polling.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_api_url() -> String {
    toggl::DEFAULT_BASE_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_refresh_interval_secs() -> u64 {
    60
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            debounce_ms: default_debounce_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl FloatingConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(credential_store::root_path()?.join("config.toml"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Write the defaults if no config exists yet; returns the path either way.
    pub fn ensure_exists() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let raw = toml::to_string_pretty(&Self::default())?;
            std::fs::write(&path, raw)?;
        }
        Ok(path)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}
