use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_GRAPHQL_QUERY_ID, PUBLIC_BEARER_TOKEN, USER_AGENT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Upstream API
    pub api_base_url: String,
    pub graphql_query_id: String,
    pub bearer_token: String,
    pub user_agent: String,
    pub request_timeout: Duration,

    // Normalization
    pub max_quote_depth: usize,

    // Output
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Upstream API
            api_base_url: parse_base_url(&env_or_default("X_API_BASE_URL", "https://api.x.com"))?,
            graphql_query_id: env_or_default("X_GRAPHQL_QUERY_ID", DEFAULT_GRAPHQL_QUERY_ID),
            bearer_token: env_or_default("X_BEARER_TOKEN", PUBLIC_BEARER_TOKEN),
            user_agent: env_or_default("USER_AGENT", USER_AGENT),
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),

            // Normalization
            max_quote_depth: parse_env_usize("MAX_QUOTE_DEPTH", 5)?,

            // Output
            output_dir: PathBuf::from(env_or_default("OUTPUT_DIR", "./results")),
        })
    }

    /// Configuration pointing at `api_base_url`, with defaults for everything else.
    #[must_use]
    pub fn for_testing(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            graphql_query_id: DEFAULT_GRAPHQL_QUERY_ID.to_string(),
            bearer_token: "test-bearer".to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(5),
            max_quote_depth: 5,
            output_dir: PathBuf::from("./results"),
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "X_API_BASE_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.graphql_query_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "X_GRAPHQL_QUERY_ID".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(value.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidValue {
            name: "X_API_BASE_URL".to_string(),
            message: format!("must be an http(s) URL, got '{value}'"),
        }),
    }
}
