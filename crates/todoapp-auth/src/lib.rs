//! # Todo API Auth
//!
//! Bearer token handling for the Todo API.
//!
//! - [`claims`]: the claim set carried by access tokens
//! - [`jwt`]: token issuance and validation
//! - [`role`]: the coarse authorization tiers
//!
//! Validation keeps two failure kinds apart, [`TokenError::InvalidToken`]
//! (bad signature, malformed, expired) and [`TokenError::MissingClaims`]
//! (well signed but without `sub` or `id`). Callers facing the network are
//! expected to collapse both into [`COULD_NOT_VALIDATE_USER`].
//!
//! # Example
//!
//! ```ignore
//! use todoapp_auth::{UserRole, create_access_token, verify_token};
//! use todoapp_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_access_token("alice", 7, UserRole::User, config.access_token_ttl(), &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.sub, "alice");
//! ```

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::Claims;
pub use jwt::{COULD_NOT_VALIDATE_USER, TokenError, create_access_token, verify_token};
pub use role::UserRole;
