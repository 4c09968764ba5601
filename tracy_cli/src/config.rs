//! `tracy.toml` loading.
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "tracy"
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use tracy_common::config::{ConfigError, ConfigLoader, SharedConfig};
use tracy_common::consts::DEFAULT_CONFIG_PATH;

use crate::error::{CliError, CliResult};

/// Configuration of the `tracy` binary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Fields common to all tracy applications.
    #[serde(default)]
    pub shared: SharedConfig,
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
/// tried and defaults are used when it is absent.
pub fn load_cli_config(path: Option<&Path>) -> CliResult<CliConfig> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };

    let config = match CliConfig::load(path) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound) if !required => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(CliConfig::default());
        }
        Err(source) => {
            return Err(CliError::Config {
                path: path.display().to_string(),
                source,
            });
        }
    };

    config.shared.validate().map_err(|source| CliError::Config {
        path: path.display().to_string(),
        source,
    })?;
    Ok(config)
}
