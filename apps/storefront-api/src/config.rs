//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Development signing secret. Startup warns when it is in use.
pub const DEV_JWT_SECRET: &str = "storefront-dev-secret-change-in-production";

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_VALIDITY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Upper bound of the connection pool
    pub db_max_connections: u32,

    /// HMAC secret for bearer tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    pub token_validity_secs: i64,

    /// Empty the cart after a successful order submission
    pub clear_cart_on_submit: bool,

    /// Insert the default catalog into an empty database at startup
    pub seed_catalog: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = AppConfig {
            http_port: parse(&lookup, "HTTP_PORT", 8080)?,

            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "storefront.db".to_string()),

            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 5)?,

            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),

            token_validity_secs: parse(&lookup, "TOKEN_VALIDITY_SECS", 500_000)?,

            clear_cart_on_submit: parse(&lookup, "CLEAR_CART_ON_SUBMIT", false)?,

            seed_catalog: parse(&lookup, "SEED_CATALOG", true)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::OutOfRange {
                key: "DB_MAX_CONNECTIONS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if config.token_validity_secs <= 0 {
            return Err(ConfigError::OutOfRange {
                key: "TOKEN_VALIDITY_SECS".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if config.token_validity_secs > MAX_TOKEN_VALIDITY_SECS {
            return Err(ConfigError::OutOfRange {
                key: "TOKEN_VALIDITY_SECS".to_string(),
                reason: format!("must be at most {MAX_TOKEN_VALIDITY_SECS}"),
            });
        }
        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        Ok(config)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} is out of range: {reason}")]
    OutOfRange { key: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
