//! TOML files for the tracy binaries.
//!
//! The recorder has no runtime settings; its limits live in
//! [`crate::consts`]. What is read from disk is the logging setup of a
//! binary (`[shared]`) and the scenarios `tracy replay` renders. Both go
//! through [`ConfigLoader`].
//!
//! ```rust
//! use serde::Deserialize;
//! use tracy_common::config::{ConfigLoader, LogLevel, SharedConfig};
//!
//! #[derive(Deserialize)]
//! struct ReplayConfig {
//!     shared: SharedConfig,
//! }
//!
//! let config = ReplayConfig::from_toml("[shared]\nservice_name = \"replay\"\n").unwrap();
//! assert_eq!(config.shared.log_level, LogLevel::Info);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Why a TOML file could not be turned into a config value.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Nothing at the given path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// Unreadable file, bad TOML, or a document of the wrong shape.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Well-formed but unusable values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Default `tracing` verbosity of a binary, spelled lowercase in TOML.
///
/// `trace` also shows the recorder's clear and checkpoint events; `warn`
/// keeps only overflow and lookup-failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// The `[shared]` table every tracy binary accepts.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "tracy-demo"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name reported in the startup log line.
    pub service_name: String,
}

impl SharedConfig {
    /// Reject an empty `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "tracy".to_string(),
        }
    }
}

/// Deserialize a value from a TOML file or string.
///
/// A missing file is [`ConfigError::FileNotFound`]; every other read or
/// parse failure is [`ConfigError::ParseError`].
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct TestWrapper {
            level: LogLevel,
        }

        for (text, level) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let doc = format!("level = \"{text}\"");
            assert_eq!(TestWrapper::from_toml(&doc).unwrap().level, level);
            assert_eq!(level.as_str(), text);
        }
    }

    #[test]
    fn test_log_level_rejects_unknown() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct TestWrapper {
            level: LogLevel,
        }

        let result = TestWrapper::from_toml("level = \"loud\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_log_level_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_shared_config_validation_success() {
        let config = SharedConfig {
            log_level: LogLevel::Info,
            service_name: "test-service".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shared_config_validation_empty_service_name() {
        let config = SharedConfig {
            log_level: LogLevel::Info,
            service_name: "".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_shared_config_default_is_valid() {
        assert!(SharedConfig::default().validate().is_ok());
    }
}
