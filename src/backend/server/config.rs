/**
 * Server Configuration
 *
 * Settings come from the environment (a `.env` file is loaded first by the
 * binary). Only `JWT_SECRET` is required, and only when a database is
 * configured: without `DATABASE_URL` the server runs on the in-memory store
 * and falls back to a development secret.
 *
 * | Variable                   | Default                 |
 * |----------------------------|-------------------------|
 * | `DATABASE_URL`             | unset: in-memory store  |
 * | `DATABASE_MAX_CONNECTIONS` | 10                      |
 * | `REDIS_URL`                | unset: cache disabled   |
 * | `JWT_SECRET`               | required with a database|
 * | `JWT_TTL_HOURS`            | 72                      |
 * | `SERVER_PORT`              | 3000                    |
 */

use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::backend::cache::{Cache, RedisCache};

const DEV_JWT_SECRET: &str = "conduit-development-secret";
const DEFAULT_JWT_TTL_HOURS: i64 = 72;
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL");
        let jwt_secret = match (get("JWT_SECRET"), &database_url) {
            (Some(secret), _) => secret,
            (None, Some(_)) => return Err(ConfigError::Missing("JWT_SECRET")),
            (None, None) => {
                tracing::warn!("JWT_SECRET not set. Using the development secret.");
                DEV_JWT_SECRET.to_string()
            }
        };

        let ttl_hours = parse_or("JWT_TTL_HOURS", get("JWT_TTL_HOURS"), DEFAULT_JWT_TTL_HOURS)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                value: ttl_hours.to_string(),
            });
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            redis_url: get("REDIS_URL"),
            jwt_secret,
            jwt_ttl: Duration::hours(ttl_hours),
            server_port: parse_or("SERVER_PORT", get("SERVER_PORT"), DEFAULT_SERVER_PORT)?,
        })
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Connect to Postgres and run migrations
///
/// # Returns
///
/// - `Ok(None)` if `DATABASE_URL` is not set
/// - `Ok(Some(pool))` once connected and migrated
///
/// # Errors
///
/// A configured database that cannot be reached or migrated is fatal.
pub async fn load_database(config: &Config) -> Result<Option<PgPool>, StartupError> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(Some(pool))
}

/// Build the article cache
///
/// The cache is optional: no `REDIS_URL`, a bad URL or an unreachable server
/// all leave it disabled with a warning.
pub async fn load_cache(config: &Config) -> Cache {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("REDIS_URL not set. Article cache disabled.");
        return Cache::disabled();
    };

    let redis = match RedisCache::new(redis_url) {
        Ok(redis) => redis,
        Err(e) => {
            tracing::warn!("Invalid REDIS_URL, article cache disabled: {}", e);
            return Cache::disabled();
        }
    };
    if let Err(e) = redis.check_connection().await {
        tracing::warn!("Redis unreachable, article cache disabled: {}", e);
        return Cache::disabled();
    }

    tracing::info!("Article cache connected");
    Cache::new(Arc::new(redis))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
