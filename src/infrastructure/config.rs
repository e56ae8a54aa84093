use anyhow::Context;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_LOG_FILTER: &str = "faculty_portal=debug,tower_http=debug";

/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub log_filter: String,
    pub db: DbPoolSettings,
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub private_key_path: String,
    pub public_key_path: String,
    pub access_token_expiry: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            port: env_or("PORT", 3000),
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            db: DbPoolSettings::from_env(),
            jwt: JwtSettings::from_env(),
        })
    }
}

impl DbPoolSettings {
    pub fn from_env() -> Self {
        Self {
            max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: env_or("DB_MIN_CONNECTIONS", 5),
            acquire_timeout: Duration::from_secs(env_or("DB_ACQUIRE_TIMEOUT_SECS", 3)),
            idle_timeout: Duration::from_secs(env_or("DB_IDLE_TIMEOUT_SECS", 600)),
        }
    }
}

impl Default for DbPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl JwtSettings {
    pub fn from_env() -> Self {
        Self {
            private_key_path: env::var("JWT_PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "keys/private_key.pem".to_string()),
            public_key_path: env::var("JWT_PUBLIC_KEY_PATH")
                .unwrap_or_else(|_| "keys/public_key.pem".to_string()),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", 900),
        }
    }
}

/// Reads and parses `key`, falling back to `default` when unset or unparsable.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
