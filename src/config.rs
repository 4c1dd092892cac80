// Runtime configuration
// Loaded once at startup and passed explicitly into the components that need it

use thiserror::Error;

/// Default token lifetime: 100 hours
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 360_000;

/// Longest accepted token lifetime: ten years
pub const MAX_TOKEN_TTL_SECONDS: i64 = 315_360_000;

/// Default bcrypt cost factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string. `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let token_ttl_seconds = match get("TOKEN_TTL_SECONDS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(ttl) if (1..=MAX_TOKEN_TTL_SECONDS).contains(&ttl) => ttl,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "TOKEN_TTL_SECONDS",
                        value: raw,
                        reason: "expected between 1 second and 10 years",
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "BCRYPT_COST",
                        value: raw,
                        reason: "expected a cost between 4 and 31",
                    })
                }
            },
            None => DEFAULT_BCRYPT_COST,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            token_ttl_seconds,
            bcrypt_cost,
        })
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
