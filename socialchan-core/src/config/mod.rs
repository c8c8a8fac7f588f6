//! Configuration management for socialchan
//!
//! Defaults, environment overrides (`SOCIALCHAN_<SECTION>_<KEY>`), TOML files
//! and validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Persistence configuration
    pub store: StoreConfig,

    /// Limits applied to channel input
    pub channel: ChannelConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file; `None` keeps everything in memory
    pub database_path: Option<PathBuf>,

    /// Maximum pooled connections for file databases
    pub pool_size: u32,

    /// How long a connection waits on a locked database
    #[serde(with = "humantime_serde")]
    pub busy_timeout: Duration,
}

/// Channel input limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub max_group_name_len: usize,
    pub max_name_len: usize,
    pub max_purpose_len: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include timestamps
    pub with_timestamp: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: Some(PathBuf::from("./socialchan.sqlite3")),
            pool_size: 8,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_group_name_len: 200,
            max_name_len: 200,
            max_purpose_len: 2_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::InvalidValue(format!("{}: {}", name, e)))
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    ///
    /// Example: SOCIALCHAN_STORE_DATABASE_PATH=/var/lib/socialchan/db.sqlite3
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps variable names to values
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Store config
        if let Some(path) = lookup("SOCIALCHAN_STORE_DATABASE_PATH") {
            self.store.database_path = match path.as_str() {
                "" | ":memory:" => None,
                _ => Some(PathBuf::from(path)),
            };
        }
        if let Some(size) = lookup("SOCIALCHAN_STORE_POOL_SIZE") {
            self.store.pool_size = parse_var("SOCIALCHAN_STORE_POOL_SIZE", &size)?;
        }
        if let Some(timeout) = lookup("SOCIALCHAN_STORE_BUSY_TIMEOUT") {
            self.store.busy_timeout = humantime_serde::re::humantime::parse_duration(&timeout)
                .map_err(|e| {
                    ConfigError::InvalidValue(format!("SOCIALCHAN_STORE_BUSY_TIMEOUT: {}", e))
                })?;
        }

        // Channel config
        if let Some(len) = lookup("SOCIALCHAN_CHANNEL_MAX_GROUP_NAME_LEN") {
            self.channel.max_group_name_len =
                parse_var("SOCIALCHAN_CHANNEL_MAX_GROUP_NAME_LEN", &len)?;
        }
        if let Some(len) = lookup("SOCIALCHAN_CHANNEL_MAX_NAME_LEN") {
            self.channel.max_name_len = parse_var("SOCIALCHAN_CHANNEL_MAX_NAME_LEN", &len)?;
        }
        if let Some(len) = lookup("SOCIALCHAN_CHANNEL_MAX_PURPOSE_LEN") {
            self.channel.max_purpose_len = parse_var("SOCIALCHAN_CHANNEL_MAX_PURPOSE_LEN", &len)?;
        }

        // Logging config
        if let Some(level) = lookup("SOCIALCHAN_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Some(json) = lookup("SOCIALCHAN_LOG_JSON") {
            self.logging.json_format = parse_var("SOCIALCHAN_LOG_JSON", &json)?;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.pool_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "pool_size must be greater than 0".to_string(),
            ));
        }

        if self.channel.max_group_name_len == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_group_name_len must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}
