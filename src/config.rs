//! Configuration management for the tool agent.
//!
//! Configuration is read from environment variables (a `.env` file in the
//! working directory is loaded first, if present):
//! - `ANTHROPIC_API_KEY` - Required. API key for the Anthropic Messages API.
//! - `MODEL_NAME` - Optional. Model identifier. Defaults to `claude-3-5-sonnet-20241022`.
//! - `ANTHROPIC_BASE_URL` - Optional. API host. Defaults to `https://api.anthropic.com`.
//! - `DATABASE_PATH` - Optional. SQLite database file. Defaults to `app.db`.
//! - `MAX_ITERATIONS` - Optional. Model round trips per turn. Defaults to `50`; `0` disables the cap.
//! - `TOOL_TIMEOUT_SECS` - Optional. Per tool call timeout. Defaults to `60`; `0` disables it.
//! - `MAX_TOKENS` - Optional. Response token limit. Defaults to `1024`.
//!
//! Sampling temperature is always 0 and cannot be configured.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_DATABASE_PATH: &str = "app.db";
pub const DEFAULT_MAX_ITERATIONS: usize = 50;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Anthropic API key
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// API base URL (no trailing `/v1`)
    pub base_url: String,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum model round trips per turn (`None` = unbounded)
    pub max_iterations: Option<usize>,

    /// Per tool call timeout in seconds (`None` = wait forever)
    pub tool_timeout_secs: Option<u64>,

    /// Maximum tokens per model response
    pub max_tokens: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `ANTHROPIC_API_KEY` is not set,
    /// and `ConfigError::InvalidValue` for unparsable numbers.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to load .env file: {}", e);
            }
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))?;

        let mut config = Self::new(
            api_key,
            lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
        );

        if let Some(base_url) = lookup("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        config.max_iterations =
            non_zero(parse_var(&lookup, "MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?);
        config.tool_timeout_secs =
            non_zero(parse_var(&lookup, "TOOL_TIMEOUT_SECS", DEFAULT_TOOL_TIMEOUT_SECS)?);
        config.max_tokens = parse_var(&lookup, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?;

        Ok(config)
    }

    /// Create a config with default limits.
    pub fn new(api_key: String, model: String, database_path: PathBuf) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            database_path,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            tool_timeout_secs: Some(DEFAULT_TOOL_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), format!("{}", e)))
}

fn non_zero<T: PartialEq + Default>(value: T) -> Option<T> {
    (value != T::default()).then_some(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn only_the_api_key_is_required() {
        let config = from_vars(&[("ANTHROPIC_API_KEY", "sk-test")]).expect("config");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.max_iterations, Some(50));
        assert_eq!(config.tool_timeout_secs, Some(60));
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn missing_or_blank_api_key_is_an_error() {
        let err = from_vars(&[("MODEL_NAME", "m")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref name) if name == "ANTHROPIC_API_KEY"));
        assert!(matches!(
            from_vars(&[("ANTHROPIC_API_KEY", "  ")]),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn overrides_are_read_and_zero_means_unbounded() {
        let config = from_vars(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("MODEL_NAME", "claude-test"),
            ("ANTHROPIC_BASE_URL", "http://127.0.0.1:9"),
            ("DATABASE_PATH", "/tmp/agent.db"),
            ("MAX_ITERATIONS", "0"),
            ("TOOL_TIMEOUT_SECS", "0"),
            ("MAX_TOKENS", "2048"),
        ])
        .expect("config");
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.database_path, PathBuf::from("/tmp/agent.db"));
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.tool_timeout_secs, None);
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn unparsable_limit_fails_the_load() {
        let err = from_vars(&[("ANTHROPIC_API_KEY", "sk-test"), ("MAX_TOKENS", "many")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "MAX_TOKENS"));
    }

    #[test]
    fn zero_disables_a_limit() {
        assert_eq!(non_zero(0usize), None);
        assert_eq!(non_zero(50usize), Some(50));
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = parse_value::<usize>("MAX_ITERATIONS", "lots").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "MAX_ITERATIONS"));
        assert_eq!(parse_value::<u64>("TOOL_TIMEOUT_SECS", " 30 ").unwrap(), 30);
    }

    #[test]
    fn new_uses_defaults() {
        let config = Config::new("key".into(), DEFAULT_MODEL.into(), "test.db".into());
        assert_eq!(config.max_iterations, Some(50));
        assert_eq!(config.tool_timeout_secs, Some(60));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
