// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use crate::config::{
    CodeDnaConfig, ConfigLoader, FingerprintConfig, ImportConfig, LogConfig, StoreConfig, Validate,
};
use crate::error::config::ConfigError;
use crate::tests::TestFixture;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use test_case::test_case;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = CodeDnaConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.fingerprint.prefix_length, 4);
    assert!(config.import.workers > 0);
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = CodeDnaConfig::default();

    config.import.workers = 0;
    assert!(config.validate().is_err());

    config.import.workers = 4;
    config.fingerprint.prefix_length = 9;
    assert!(config.validate().is_err());

    config.fingerprint.prefix_length = 4;
    config.log.level = "verbose".to_string();
    assert!(config.validate().is_err());

    config.log.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

#[test_case(0, false ; "zero bits")]
#[test_case(1, true ; "one bit")]
#[test_case(4, true ; "nibble")]
#[test_case(8, true ; "full byte")]
#[test_case(9, false ; "too wide")]
fn test_prefix_length_bounds(prefix_length: u8, valid: bool) {
    let config = FingerprintConfig { prefix_length };
    assert_eq!(config.validate().is_ok(), valid);
}

/// Test that validation fails for empty paths.
#[test]
fn test_specific_validation_rules() {
    let store = StoreConfig {
        path: PathBuf::new(),
    };
    assert_eq!(
        store.validate(),
        Err(ConfigError::MissingValue("store.path".to_string()))
    );

    let import = ImportConfig {
        history_dir: PathBuf::new(),
        ..ImportConfig::default()
    };
    assert!(import.validate().is_err());

    let log = LogConfig {
        level: "warn".to_string(),
        ..LogConfig::default()
    };
    assert!(log.validate().is_ok());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    std::env::remove_var("TEST_FILE__IMPORT__WORKERS");

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config_file_test.toml");

    let config_content = r#"
    [fingerprint]
    prefix_length = 6

    [import]
    workers = 3
    skip_existing = false
    "#;

    fs::write(&config_path, config_content).unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.fingerprint.prefix_length, 6);
    assert_eq!(config.import.workers, 3);
    assert!(!config.import.skip_existing);

    // Other values should be defaults
    assert_eq!(config.store, StoreConfig::default());
    assert_eq!(config.log, LogConfig::default());
}

/// Test loading configuration from JSON.
#[test]
fn test_load_config_from_json() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, r#"{ "store": { "path": "db/ids.json" } }"#).unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_JSON").load().unwrap();
    assert_eq!(config.store.path, PathBuf::from("db/ids.json"));
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("[import]\nworkers = 2\n", "toml")
        .unwrap();

    fixture.set_env("TEST_ENV__IMPORT__WORKERS", "7");
    fixture.set_env("TEST_ENV__LOG__LEVEL", "debug");

    let loader = ConfigLoader::new(Some(&config_path), "TEST_ENV");
    let config = loader.load().unwrap();

    assert_eq!(config.import.workers, 7);
    assert_eq!(config.log.level, "debug");
}

/// Test that a missing file is reported as such.
#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("absent.toml");

    let loader = ConfigLoader::new(Some(&config_path), "TEST_MISSING");
    assert_eq!(loader.load(), Err(ConfigError::FileNotFound(config_path)));
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("invalid.toml");

    let config_content = r#"
    [import
    workers = four"
    "#;

    fs::write(&config_path, config_content).unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INVALID");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that an out of range value in a file fails validation.
#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("bad_prefix.toml");
    fs::write(&config_path, "[fingerprint]\nprefix_length = 12\n").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_BAD_PREFIX");
    assert!(matches!(
        loader.load(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));
}

/// Test that unknown extensions are rejected.
#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.ini");
    fs::write(&config_path, "").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_EXT");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}
