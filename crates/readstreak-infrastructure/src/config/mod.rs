use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use readstreak_domain::calendar::DayBoundary;
use readstreak_domain::shared::DomainError;
use readstreak_domain::streak::{DailyThreshold, ThresholdPolicy};

const APP_DIR: &str = "readstreak";
const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "readstreak.db";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub fn filter_directive(&self) -> String {
        format!("{level},readstreak={level}", level = self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub level: LogLevel,
    /// Mirror events to stdout in a human-readable format.
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: data_dir().join("logs"),
            level: LogLevel::Info,
            stdout: false,
        }
    }
}

/// Engine configuration, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    /// IANA zone name. `None` uses the host's zone.
    pub timezone: Option<String>,
    pub default_daily_threshold: i64,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: data_dir().join(DATABASE_FILE),
            timezone: None,
            default_daily_threshold: i64::from(DailyThreshold::DEFAULT.value()),
            logging: LoggingConfig::default(),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl EngineConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Read the config at `path`. A missing file yields defaults; an
    /// unreadable or malformed one is logged and also yields defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Config loaded");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn day_boundary(&self) -> Result<DayBoundary, DomainError> {
        match &self.timezone {
            Some(name) => DayBoundary::from_name(name),
            None => Ok(DayBoundary::system()),
        }
    }

    pub fn default_threshold(&self) -> Result<DailyThreshold, DomainError> {
        Ok(ThresholdPolicy::validate_integer(self.default_daily_threshold)?)
    }
}
