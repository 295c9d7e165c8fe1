use log::{info, warn};
use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "supersecret";
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
/// Thirty days
const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

#[derive(Debug, Error)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

/// Process configuration, read from the environment once at start-up
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. Without it the server keeps everything in memory.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub run_migrations: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let database_url = var("DATABASE_URL");
        if database_url.is_none() {
            warn!("DATABASE_URL not set, data will only be kept in memory");
        }

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl_secs = token_ttl(try_load("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?)?;

        Ok(Self {
            port: try_load("PORT", 3000)?,
            database_url,
            jwt_secret,
            token_ttl_secs,
            run_migrations: try_load("RUN_MIGRATIONS", true)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            run_migrations: true,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(value) = var(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        reason: e.to_string(),
        value,
    })
}

fn token_ttl(secs: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Ok(secs);
    }

    Err(ConfigError {
        key: "TOKEN_TTL_SECS",
        value: secs.to_string(),
        reason: format!("must be between 1 and {MAX_TOKEN_TTL_SECS} seconds"),
    })
}
