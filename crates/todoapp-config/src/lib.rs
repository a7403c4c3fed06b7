//! # Todo API Config
//!
//! Configuration read from the environment once at startup:
//!
//! - [`database`]: `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`
//! - [`jwt`]: `SECRET_KEY`, `ALGORITHM`, `ACCESS_TOKEN_EXPIRE_MINUTES`
//! - [`cors`]: `ALLOWED_ORIGINS`
//! - [`server`]: `HOST`, `PORT`, `DEBUG`
//!
//! [`Settings`] bundles all of them. It is immutable once built and handed to
//! the rest of the application by value or reference; nothing re-reads the
//! environment per request.
//!
//! # Example
//!
//! ```ignore
//! use todoapp_config::Settings;
//!
//! dotenvy::dotenv().ok();
//! let settings = Settings::from_env()?;
//! println!("listening on {}", settings.server.bind_address());
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

use std::str::FromStr;

use anyhow::{Context, anyhow};

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub server: ServerConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database: DatabaseConfig::from_lookup(&lookup)?,
            jwt: JwtConfig::from_lookup(&lookup)?,
            cors: CorsConfig::from_lookup(&lookup),
            server: ServerConfig::from_lookup(&lookup)?,
        })
    }
}

/// Parses `key` with `FromStr`, falling back to `default` when it is unset.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` in any case.
pub(crate) fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(anyhow!("invalid value for {key}: {other:?}")),
        },
        None => Ok(default),
    }
}
