//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use areal_core::config::{
    CliConfigOverrides, ConfigSource, ExecutionMode, LayeredConfig, DEFAULT_AREA_EPSILON,
};
use areal_core::error::ArealError;
use areal_core::models::ValidityMode;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 6] = [
    "AREAL_CRS",
    "AREAL_JOIN_SUFFIX",
    "AREAL_AREA_EPSILON",
    "AREAL_GEOMETRY_VALIDITY",
    "AREAL_EXECUTION",
    "AREAL_THREADS",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_default_configuration() {
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.crs.value, None);
    assert_eq!(config.join_suffix.value, "_right");
    assert_eq!(config.area_epsilon.value, DEFAULT_AREA_EPSILON);
    assert_eq!(config.geometry_validity.value, ValidityMode::Strict);
    assert_eq!(config.execution.source, ConfigSource::Default);
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file(
        r#"
crs = 3857
# Only override CRS, leave others as defaults
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.crs.value, Some(3857));
    assert_eq!(config.crs.source, ConfigSource::File);
    assert_eq!(config.join_suffix.source, ConfigSource::Default);
    assert_eq!(config.execution_mode(), ExecutionMode::Sequential);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("AREAL_CRS", "32748");
    env::set_var("AREAL_EXECUTION", "parallel");
    env::set_var("AREAL_JOIN_SUFFIX", "_env");

    let file = config_file(
        r#"
crs = 3857
execution = "sequential"
join_suffix = "_file"
"#,
    );

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.crs.value, Some(32748));
    assert_eq!(config.crs.source, ConfigSource::Environment);
    assert_eq!(config.execution.value, ExecutionMode::Parallel);
    assert_eq!(config.join_suffix.value, "_env");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("AREAL_CRS", "not-a-number");
    env::set_var("AREAL_AREA_EPSILON", "-1");
    env::set_var("AREAL_THREADS", "0");
    env::set_var("AREAL_GEOMETRY_VALIDITY", "sometimes");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.crs.value, None);
    assert_eq!(config.crs.source, ConfigSource::Default);
    assert_eq!(config.area_epsilon.value, DEFAULT_AREA_EPSILON);
    assert_eq!(config.threads.value, None);
    assert_eq!(config.geometry_validity.value, ValidityMode::Strict);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    env::set_var("AREAL_THREADS", "2");
    env::set_var("AREAL_EXECUTION", "parallel");

    let file = config_file("geometry_validity = \"Lenient\"");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    config.update_from_cli(CliConfigOverrides {
        threads: Some(6),
        geometry_validity: Some(ValidityMode::Strict),
        ..Default::default()
    });

    assert_eq!(config.execution_mode(), ExecutionMode::ParallelWith(6));
    assert_eq!(config.threads.source, ConfigSource::Cli);
    assert_eq!(config.geometry_validity.value, ValidityMode::Strict);
    assert_eq!(config.geometry_validity.source, ConfigSource::Cli);

    clear_env();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/areal.toml");
    match result {
        Err(ArealError::ConfigMissing { key }) => assert!(key.contains("/nonexistent/areal.toml")),
        other => panic!("expected ConfigMissing, got {:?}", other.map(|_| ())),
    }
}
