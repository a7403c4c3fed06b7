//! Bearer token signing configuration.
//!
//! # Environment Variables
//!
//! - `SECRET_KEY`: HMAC signing secret
//! - `ALGORITHM`: `HS256` (default), `HS384` or `HS512`
//! - `ACCESS_TOKEN_EXPIRE_MINUTES`: token lifetime, default 30

use anyhow::bail;
use jsonwebtoken::Algorithm;
use tracing::warn;

use crate::parse_or;

const DEFAULT_SECRET: &str = "your-super-secret-key-here";

/// One year.
pub const MAX_EXPIRE_MINUTES: i64 = 365 * 24 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
}

impl JwtConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: &F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET_KEY").unwrap_or_else(|| {
            warn!("SECRET_KEY is not set, falling back to the development secret");
            DEFAULT_SECRET.to_string()
        });

        let algorithm: Algorithm = parse_or(lookup, "ALGORITHM", Algorithm::HS256)?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            bail!("ALGORITHM must be one of HS256, HS384 or HS512, got {algorithm:?}");
        }

        let access_token_expire_minutes = parse_or(lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?;
        if access_token_expire_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }
        if access_token_expire_minutes > MAX_EXPIRE_MINUTES {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must not exceed {MAX_EXPIRE_MINUTES}");
        }

        Ok(Self {
            secret,
            algorithm,
            access_token_expire_minutes,
        })
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_asymmetric_algorithm() {
        let lookup = |key: &str| (key == "ALGORITHM").then(|| "RS256".to_string());
        assert!(JwtConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        let lookup = |key: &str| (key == "ALGORITHM").then(|| "ROT13".to_string());
        assert!(JwtConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn test_ttl_in_minutes() {
        let lookup = |key: &str| (key == "ACCESS_TOKEN_EXPIRE_MINUTES").then(|| "45".to_string());
        let config = JwtConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.access_token_ttl(), chrono::Duration::minutes(45));
    }

    #[test]
    fn test_rejects_expiry_beyond_one_year() {
        let lookup = |key: &str| {
            (key == "ACCESS_TOKEN_EXPIRE_MINUTES").then(|| "200000000000".to_string())
        };
        assert!(JwtConfig::from_lookup(&lookup).is_err());

        let lookup = |key: &str| {
            (key == "ACCESS_TOKEN_EXPIRE_MINUTES").then(|| MAX_EXPIRE_MINUTES.to_string())
        };
        assert!(JwtConfig::from_lookup(&lookup).is_ok());
    }
}
