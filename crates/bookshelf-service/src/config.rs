//! Bookshelf service configuration.
//!
//! Loaded from environment variables. The database URL is redacted in
//! Debug output.

use crate::auth::gate::{DEFAULT_AUTH_SCHEME, DEFAULT_TOKEN_HEADER, DEFAULT_TOKEN_QUERY_PARAM};
use crate::auth::token_cache::DEFAULT_TOKEN_TTL_SECONDS;
use crate::auth::TokenSettings;
use axum::http::HeaderName;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Upper bound for the token cache TTL.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 3600;

/// Default period between token cache sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Default cap for the `delay` resource option.
pub const DEFAULT_MAX_RESPONSE_DELAY_SECONDS: u64 = 10;

/// Per-request timeout applied to every route. The delay cap must stay below it.
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Lifetime of a cached authentication (default: 20s).
    pub token_ttl_seconds: u64,

    /// Header carrying the token (default: "Authorization").
    pub auth_header_name: String,

    /// Query parameter carrying the token when the header is absent.
    pub auth_query_param: String,

    /// Scheme literal stripped from the token (default: "Basic").
    pub auth_scheme: String,

    /// Seconds between background cache sweeps; 0 disables the sweeper.
    pub cache_sweep_interval_seconds: u64,

    /// Largest accepted value of the `delay` resource option.
    pub max_response_delay_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("auth_header_name", &self.auth_header_name)
            .field("auth_query_param", &self.auth_query_param)
            .field("auth_scheme", &self.auth_scheme)
            .field(
                "cache_sweep_interval_seconds",
                &self.cache_sweep_interval_seconds,
            )
            .field(
                "max_response_delay_seconds",
                &self.max_response_delay_seconds,
            )
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token TTL configuration: {0}")]
    InvalidTokenTtl(String),

    #[error("Invalid auth header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let token_ttl_seconds = parse_u64(vars, "AUTH_TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        if token_ttl_seconds == 0 || token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::InvalidTokenTtl(format!(
                "AUTH_TOKEN_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECONDS, token_ttl_seconds
            )));
        }

        let auth_header_name = vars
            .get("AUTH_HEADER_NAME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string());
        HeaderName::try_from(auth_header_name.as_str())
            .map_err(|e| ConfigError::InvalidHeaderName(format!("'{}': {}", auth_header_name, e)))?;

        let auth_query_param = vars
            .get("AUTH_QUERY_PARAM")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKEN_QUERY_PARAM.to_string());

        let auth_scheme = vars
            .get("AUTH_SCHEME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string());

        let cache_sweep_interval_seconds = parse_u64(
            vars,
            "AUTH_CACHE_SWEEP_INTERVAL_SECONDS",
            DEFAULT_SWEEP_INTERVAL_SECONDS,
        )?;

        let max_response_delay_seconds = parse_u64(
            vars,
            "MAX_RESPONSE_DELAY_SECONDS",
            DEFAULT_MAX_RESPONSE_DELAY_SECONDS,
        )?;
        if max_response_delay_seconds >= REQUEST_TIMEOUT_SECONDS {
            return Err(ConfigError::InvalidValue {
                name: "MAX_RESPONSE_DELAY_SECONDS".to_string(),
                reason: format!(
                    "must be below the {}s request timeout, got {}",
                    REQUEST_TIMEOUT_SECONDS, max_response_delay_seconds
                ),
            });
        }

        Ok(Config {
            database_url,
            bind_address,
            token_ttl_seconds,
            auth_header_name,
            auth_query_param,
            auth_scheme,
            cache_sweep_interval_seconds,
            max_response_delay_seconds,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }

    /// Token sourcing settings for the authorization gate.
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            header_name: self.auth_header_name.clone(),
            query_param: self.auth_query_param.clone(),
            scheme: self.auth_scheme.clone(),
        }
    }
}

fn parse_u64(vars: &HashMap<String, String>, name: &str, default: u64) -> Result<u64, ConfigError> {
    match vars.get(name) {
        Some(value) => value.parse().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("expected a non-negative integer, got '{}': {}", value, e),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "DATABASE_URL".to_string(),
            "postgresql://localhost/bookshelf".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.database_url, "postgresql://localhost/bookshelf");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.token_ttl_seconds, 20);
        assert_eq!(config.token_ttl(), Duration::from_secs(20));
        assert_eq!(config.auth_header_name, "Authorization");
        assert_eq!(config.auth_query_param, "Authorization");
        assert_eq!(config.auth_scheme, "Basic");
        assert_eq!(config.cache_sweep_interval_seconds, 60);
        assert_eq!(config.max_response_delay_seconds, 10);
    }

    #[test]
    fn test_from_vars_missing_database_url() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "DATABASE_URL"));
    }

    #[test]
    fn test_from_vars_overrides() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("AUTH_TOKEN_TTL_SECONDS".to_string(), "45".to_string());
        vars.insert("AUTH_HEADER_NAME".to_string(), "X-Auth-Token".to_string());
        vars.insert("AUTH_QUERY_PARAM".to_string(), "token".to_string());
        vars.insert("AUTH_SCHEME".to_string(), "Token".to_string());
        vars.insert(
            "AUTH_CACHE_SWEEP_INTERVAL_SECONDS".to_string(),
            "0".to_string(),
        );
        vars.insert("MAX_RESPONSE_DELAY_SECONDS".to_string(), "2".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.token_ttl_seconds, 45);
        assert_eq!(config.cache_sweep_interval_seconds, 0);
        assert_eq!(config.max_response_delay_seconds, 2);
        assert_eq!(
            config.token_settings(),
            TokenSettings {
                header_name: "X-Auth-Token".to_string(),
                query_param: "token".to_string(),
                scheme: "Token".to_string(),
            }
        );
    }

    #[test]
    fn test_from_vars_zero_ttl_rejected() {
        let mut vars = base_vars();
        vars.insert("AUTH_TOKEN_TTL_SECONDS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidTokenTtl(_))));
    }

    #[test]
    fn test_from_vars_ttl_above_max_rejected() {
        let mut vars = base_vars();
        vars.insert("AUTH_TOKEN_TTL_SECONDS".to_string(), "3601".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidTokenTtl(msg)) if msg.contains("got 3601"))
        );
    }

    #[test]
    fn test_from_vars_non_numeric_ttl_rejected() {
        let mut vars = base_vars();
        vars.insert("AUTH_TOKEN_TTL_SECONDS".to_string(), "twenty".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { name, .. }) if name == "AUTH_TOKEN_TTL_SECONDS")
        );
    }

    #[test]
    fn test_from_vars_delay_cap_at_request_timeout_rejected() {
        let mut vars = base_vars();
        vars.insert("MAX_RESPONSE_DELAY_SECONDS".to_string(), "30".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, reason })
                if name == "MAX_RESPONSE_DELAY_SECONDS" && reason.contains("got 30")
        ));
    }

    #[test]
    fn test_from_vars_delay_cap_below_request_timeout_accepted() {
        let mut vars = base_vars();
        vars.insert("MAX_RESPONSE_DELAY_SECONDS".to_string(), "29".to_string());

        let config = Config::from_vars(&vars).unwrap();
        assert_eq!(config.max_response_delay_seconds, 29);
    }

    #[test]
    fn test_from_vars_invalid_header_name_rejected() {
        let mut vars = base_vars();
        vars.insert("AUTH_HEADER_NAME".to_string(), "Bad Header".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidHeaderName(_))));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let mut vars = base_vars();
        vars.insert(
            "DATABASE_URL".to_string(),
            "postgresql://admin:hunter2@db/bookshelf".to_string(),
        );
        let config = Config::from_vars(&vars).unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
