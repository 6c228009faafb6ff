//! Configuration for the `emf-example` binary
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables:
//!
//! - `EMF_LOG_GROUP`: CloudWatch Logs group (default: emf-test)
//! - `EMF_LOG_STREAM`: CloudWatch Logs stream (default: emf-test)
//! - `EMF_OUTPUT`: `lines`, `log_events`, `cli_json` or `put_log_events_input`
//!   (default: lines)
//! - `EMF_LOG_FORMAT`: `text` or `json` (default: text)
//! - `EMF_LOG_LEVEL`: tracing filter when `RUST_LOG` is unset (default: info)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How rendered metrics are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One EMF document per line on stdout
    #[default]
    Lines,
    /// One `{"timestamp":..,"message":..}` log event per line
    LogEvents,
    /// JSON array for `aws logs put-log-events --log-events`
    CliJson,
    /// Full request for `aws logs put-log-events --cli-input-json`,
    /// addressed to `log_group`/`log_stream`
    PutLogEventsInput,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lines" => Ok(OutputMode::Lines),
            "log_events" | "log-events" => Ok(OutputMode::LogEvents),
            "cli_json" | "cli-json" => Ok(OutputMode::CliJson),
            "put_log_events_input" | "put-log-events-input" => Ok(OutputMode::PutLogEventsInput),
            other => Err(other.to_string()),
        }
    }
}

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmfConfig {
    pub log_group: String,
    pub log_stream: String,
    pub output: OutputMode,
    pub log_format: LogFormat,
    pub log_level: String,
}

impl Default for EmfConfig {
    fn default() -> Self {
        EmfConfig {
            log_group: "emf-test".to_string(),
            log_stream: "emf-test".to_string(),
            output: OutputMode::Lines,
            log_format: LogFormat::Text,
            log_level: "info".to_string(),
        }
    }
}

impl EmfConfig {
    /// Parse from TOML text; missing keys take defaults
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// File (if any), then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `EMF_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("EMF_LOG_GROUP") {
            self.log_group = v;
        }
        if let Some(v) = lookup("EMF_LOG_STREAM") {
            self.log_stream = v;
        }
        if let Some(v) = lookup("EMF_OUTPUT") {
            self.output = v
                .parse()
                .map_err(|value| ConfigError::InvalidEnv { key: "EMF_OUTPUT", value })?;
        }
        if let Some(v) = lookup("EMF_LOG_FORMAT") {
            self.log_format = v
                .parse()
                .map_err(|value| ConfigError::InvalidEnv { key: "EMF_LOG_FORMAT", value })?;
        }
        if let Some(v) = lookup("EMF_LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_group.is_empty() {
            return Err(ConfigError::Invalid("log_group must not be empty".to_string()));
        }
        if self.log_stream.is_empty() {
            return Err(ConfigError::Invalid("log_stream must not be empty".to_string()));
        }
        Ok(())
    }
}
