//! Error types for the command-line front end

use thiserror::Error;
use tracy_common::config::ConfigError;

/// Errors that abort a `tracy` invocation
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration or scenario file could not be loaded
    #[error("{path}: {source}")]
    Config {
        /// File being loaded
        path: String,
        /// Underlying loader error
        source: ConfigError,
    },

    /// Scenario file is well-formed TOML but not a usable scenario
    #[error("invalid scenario: {0}")]
    Scenario(String),

    /// Command-line argument outside its accepted range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing output failed
    #[error("IO error: {source}")]
    Io {
        /// Source IO error
        #[from]
        source: std::io::Error,
    },
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
