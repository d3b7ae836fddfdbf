use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use timesheet_core::STANDARD_WEEK_HOURS;

/// Overrides `api_url` from the config file.
pub const API_URL_ENV: &str = "TIMESHEET_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetConfig {
    /// Base URL of the REST backend, e.g. "http://localhost:8000/api"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Weekly hours above which time counts as overtime.
    #[serde(default = "default_overtime_threshold")]
    pub overtime_threshold: f64,
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_overtime_threshold() -> f64 {
    STANDARD_WEEK_HOURS
}

impl Default for TimesheetConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            overtime_threshold: default_overtime_threshold(),
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("timesheet"))
}

impl TimesheetConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load config from disk and apply the environment override. Returns the
    /// default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.with_env_override(std::env::var(API_URL_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Write the default config if none exists. Returns whether a file was
    /// created.
    pub fn ensure_exists(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    pub fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TimesheetConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, TimesheetConfig::default());
        assert_eq!(config.overtime_threshold, 40.0);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://timesheets.example.com/api\"\n").unwrap();

        let config = TimesheetConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://timesheets.example.com/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn ensure_exists_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(TimesheetConfig::ensure_exists(&path).unwrap());
        assert!(!TimesheetConfig::ensure_exists(&path).unwrap());
        assert_eq!(
            TimesheetConfig::load_from(&path).unwrap(),
            TimesheetConfig::default()
        );
    }

    #[test]
    fn env_override_replaces_api_url() {
        let config = TimesheetConfig::default()
            .with_env_override(Some("http://10.0.0.5:8000/api".to_string()));
        assert_eq!(config.api_url, "http://10.0.0.5:8000/api");

        let config = TimesheetConfig::default().with_env_override(Some("  ".to_string()));
        assert_eq!(config.api_url, default_api_url());
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(TimesheetConfig::load_from(&path).is_err());
    }
}
