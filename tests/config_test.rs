//! Tests for loading configuration from the environment.

use std::time::Duration;

use post_normalizer::config::{Config, ConfigError};
use post_normalizer::constants::{DEFAULT_GRAPHQL_QUERY_ID, PUBLIC_BEARER_TOKEN};
use serial_test::serial;

const VARS: &[&str] = &[
    "X_API_BASE_URL",
    "X_GRAPHQL_QUERY_ID",
    "X_BEARER_TOKEN",
    "USER_AGENT",
    "REQUEST_TIMEOUT_SECS",
    "MAX_QUOTE_DEPTH",
    "OUTPUT_DIR",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();

    let config = Config::from_env().expect("Failed to load config");
    assert_eq!(config.api_base_url, "https://api.x.com");
    assert_eq!(config.graphql_query_id, DEFAULT_GRAPHQL_QUERY_ID);
    assert_eq!(config.bearer_token, PUBLIC_BEARER_TOKEN);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.max_quote_depth, 5);
    assert_eq!(config.output_dir, std::path::PathBuf::from("./results"));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    std::env::set_var("X_API_BASE_URL", "http://127.0.0.1:8080/");
    std::env::set_var("X_GRAPHQL_QUERY_ID", "abc123");
    std::env::set_var("REQUEST_TIMEOUT_SECS", "10");
    std::env::set_var("MAX_QUOTE_DEPTH", "2");
    std::env::set_var("OUTPUT_DIR", "/tmp/posts");

    let config = Config::from_env().expect("Failed to load config");
    clear_env();

    assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
    assert_eq!(config.graphql_query_id, "abc123");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.max_quote_depth, 2);
    assert_eq!(config.output_dir, std::path::PathBuf::from("/tmp/posts"));
}

#[test]
#[serial]
fn test_invalid_values() {
    clear_env();
    std::env::set_var("MAX_QUOTE_DEPTH", "deep");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::ParseInt { ref name, .. } if name == "MAX_QUOTE_DEPTH"));

    clear_env();
    std::env::set_var("X_API_BASE_URL", "not a url");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "X_API_BASE_URL"));

    clear_env();
    std::env::set_var("REQUEST_TIMEOUT_SECS", "0");
    let config = Config::from_env().expect("Zero timeout parses");
    clear_env();
    assert!(config.validate().is_err());
}
