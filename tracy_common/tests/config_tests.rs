//! File-based configuration loading tests.
//!
//! Covers `ConfigLoader::load()` against real files: missing file, broken
//! TOML, defaults for omitted fields, and unknown-shape rejection.

use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracy_common::prelude::*;

#[derive(Debug, Deserialize)]
struct TestConfig {
    shared: SharedConfig,
    #[serde(default)]
    depth: u32,
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_config_loader_file_not_found() {
    let result = TestConfig::load(Path::new("/nonexistent/path/tracy.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}

#[test]
fn test_config_loader_parse_error() {
    let file = write_temp("invalid toml {{{{\n");
    let result = TestConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_config_loader_success() {
    let file = write_temp(
        r#"depth = 8

[shared]
log_level = "debug"
service_name = "tracy-test"
"#,
    );

    let config = TestConfig::load(file.path()).unwrap();
    assert_eq!(config.shared.log_level, LogLevel::Debug);
    assert_eq!(config.shared.service_name, "tracy-test");
    assert_eq!(config.depth, 8);
    assert!(config.shared.validate().is_ok());
}

#[test]
fn test_shared_config_default_log_level() {
    let file = write_temp(
        r#"[shared]
service_name = "tracy-test"
"#,
    );

    let config = TestConfig::load(file.path()).unwrap();
    assert_eq!(config.shared.log_level, LogLevel::Info);
    assert_eq!(config.depth, 0);
}

#[test]
fn test_missing_required_field_is_parse_error() {
    let file = write_temp("[shared]\nlog_level = \"warn\"\n");
    let result = TestConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_error_messages_are_readable() {
    assert_eq!(
        ConfigError::FileNotFound.to_string(),
        "Configuration file not found"
    );
    assert_eq!(
        ConfigError::ValidationError("service_name cannot be empty".into()).to_string(),
        "Configuration validation failed: service_name cannot be empty"
    );
}
