//! Integration tests for layered configuration.
//!
//! These tests go through the public API only: declare flags, load one or
//! more config files, parse command-line arguments, and check the final
//! registry state.

use std::path::PathBuf;
use std::time::Duration;

use flagfile_core::{load, ArgError, ArgParser, FlagRegistry, LoadError};
use uuid::Uuid;

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A config file in the temp directory, removed on drop.
struct TempConfig {
    path: PathBuf,
}

impl TempConfig {
    fn new(content: &str) -> Self {
        let path = std::env::temp_dir().join(format!("flagfile_it_{}.conf", Uuid::new_v4()));
        std::fs::write(&path, content).expect("write temp config");
        Self { path }
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

/// The settings used by the example application.
fn app_registry() -> FlagRegistry {
    let mut registry = FlagRegistry::new();
    registry
        .string("db-url", "localhost:5432", "Database URL")
        .unwrap();
    registry
        .string("server-host", "localhost", "Server host")
        .unwrap();
    registry.int("server-port", 8080, "Server port").unwrap();
    registry.bool("debug", false, "Enable debug mode").unwrap();
    registry
        .duration("timeout", Duration::from_secs(30), "Request timeout")
        .unwrap();
    registry
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_example_config_file_overrides_only_mentioned_settings() {
    // Arrange
    let file = TempConfig::new(
        "
        # Database configuration
        db-url = example.com:5432

        # Server configuration
        server-port = 9090

        # Enable debugging
        debug = true
    ",
    );
    let mut registry = app_registry();

    // Act
    load(&mut registry, &file.path).expect("load must succeed");

    // Assert
    assert_eq!(registry.get_str("db-url"), Some("example.com:5432"));
    assert_eq!(registry.get_int("server-port"), Some(9090));
    assert_eq!(registry.get_bool("debug"), Some(true));
    assert_eq!(registry.get_str("server-host"), Some("localhost"));
    assert!(!registry.is_set("server-host"));
}

#[test]
fn test_defaults_file_then_command_line() {
    // Arrange: a program-level defaults file loaded directly, followed by the
    // user's command line with its own config file and a flag.
    let defaults = TempConfig::new("server-host = 0.0.0.0\ntimeout = 5s\n");
    let user = TempConfig::new("timeout = 1m\nserver-port = 7000\n");
    let mut registry = app_registry();
    let parser = ArgParser::new().config_file_option("config-file", "Configuration file");

    // Act
    load(&mut registry, &defaults.path).unwrap();
    let rest = parser
        .parse(
            &mut registry,
            [
                format!("--config-file={}", user.path.display()),
                "--server-port=7001".to_string(),
                "serve".to_string(),
            ],
        )
        .unwrap();

    // Assert
    assert_eq!(rest, ["serve"]);
    assert_eq!(registry.get_str("server-host"), Some("0.0.0.0"));
    assert_eq!(registry.get_duration("timeout"), Some(Duration::from_secs(60)));
    assert_eq!(registry.get_int("server-port"), Some(7001));
    assert_eq!(registry.get_str("db-url"), Some("localhost:5432"));
}

#[test]
fn test_failed_file_keeps_entries_before_the_error() {
    let file = TempConfig::new("server-port = 9999\ndebug = maybe\ndb-url = never\n");
    let mut registry = app_registry();

    let err = load(&mut registry, &file.path).unwrap_err();

    assert!(matches!(err, LoadError::InvalidValue { line_number: 2, .. }), "{err:?}");
    assert_eq!(registry.get_int("server-port"), Some(9999));
    assert_eq!(registry.get_bool("debug"), Some(false));
    assert_eq!(registry.get_str("db-url"), Some("localhost:5432"));
}

#[test]
fn test_values_read_back_as_trimmed_text() {
    let file = TempConfig::new("   db-url   =   postgres://u@h/db?sslmode=require   \n");
    let mut registry = app_registry();

    load(&mut registry, &file.path).unwrap();

    let flag = registry.lookup("db-url").expect("declared");
    assert_eq!(flag.value().to_string(), "postgres://u@h/db?sslmode=require");
}

#[test]
fn test_missing_config_file_on_command_line() {
    let mut registry = app_registry();
    let missing = std::env::temp_dir().join(format!("flagfile_absent_{}.conf", Uuid::new_v4()));
    let parser = ArgParser::new().config_file_option("config-file", "Configuration file");

    let err = parser
        .parse(&mut registry, [format!("--config-file={}", missing.display())])
        .unwrap_err();

    match err {
        ArgError::ConfigFile(LoadError::Open { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected open error, got {other:?}"),
    }
    assert_eq!(registry.iter_set().count(), 0);
}
