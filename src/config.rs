// src/config.rs

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::assessment::EscalationPolicy;
use crate::metrics::MetricsSnapshot;

pub const CONFIG_ENV: &str = "POULTRY_MONITOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // Refresh loop
    pub refresh_interval_secs: u64,     // Default: 30 seconds
    pub history_limit: usize,           // Default: 120 points

    // Alerts
    pub notification_timeout_secs: u64, // Default: 5 seconds

    // Assessment
    pub escalation: EscalationPolicy,   // Default: maximum

    // Simulator
    pub baseline: MetricsSnapshot,      // Default: 23°C / 65% / 10 ppm / pH 7.0
    pub seed: Option<u64>,              // Default: none (OS entropy)
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            refresh_interval_secs: 30,
            history_limit: 120,
            notification_timeout_secs: 5,
            escalation: EscalationPolicy::Maximum,
            baseline: MetricsSnapshot::default(),
            seed: None,
        }
    }
}

lazy_static! {
    pub static ref DEFAULT_CONFIG: MonitorConfig = MonitorConfig::default();
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, err) => {
                write!(f, "failed to read config {}: {}", path.display(), err)
            }
            ConfigError::Parse(path, err) => {
                write!(f, "failed to parse config {}: {}", path.display(), err)
            }
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, err) => Some(err),
            ConfigError::Parse(_, err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl MonitorConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        if self.notification_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "notification_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "history_limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: MonitorConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load the config. An explicit path or `POULTRY_MONITOR_CONFIG`
    /// must point at a readable file; the per-user default location is
    /// optional and falls back to built-in defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!("loading config from {}", path.display());
            return Self::from_path(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
            let path = PathBuf::from(path);
            debug!("loading config from {} ({})", path.display(), CONFIG_ENV);
            return Self::from_path(&path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("loading config from {}", path.display());
                Self::from_path(&path)
            }
            _ => Ok(DEFAULT_CONFIG.clone()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("poultry-monitor");
            path.push("config.json");
            path
        })
    }
}
