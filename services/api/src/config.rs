//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Local end-to-end mode: every caller is a fixed user and write routes skip the role check.
    /// Never enable in production.
    pub auth_bypass: bool,
    pub cors_allowed_origin: String,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: Level::INFO,
            auth_bypass: false,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = match std::env::var("BIND_ADDRESS") {
            Ok(value) => value.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            Err(_) => defaults.bind_address,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin =
            std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.cors_allowed_origin);

        let max_body_bytes = match std::env::var("MAX_BODY_BYTES") {
            Ok(value) => value.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("MAX_BODY_BYTES".to_string(), e.to_string())
            })?,
            Err(_) => defaults.max_body_bytes,
        };

        // --- Auth Settings ---
        let auth_bypass = match std::env::var("AUTH_BYPASS") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| ConfigError::InvalidValue("AUTH_BYPASS".to_string(), value))?,
            Err(_) => defaults.auth_bypass,
        };

        Ok(Self {
            bind_address,
            log_level,
            auth_bypass,
            cors_allowed_origin,
            max_body_bytes,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address.port(), 8080);
        assert!(!config.auth_bypass);
        assert_eq!(config.log_level, Level::INFO);
    }
}
