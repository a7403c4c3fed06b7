//! Access token issuance and validation.
//!
//! Tokens are HMAC-signed JWTs whose algorithm and secret come from
//! [`JwtConfig`]. Validation runs in two steps: the signature and expiry
//! check done by `jsonwebtoken`, then a shape check that rejects tokens
//! without a subject or user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use todoapp_config::JwtConfig;

use crate::claims::{Claims, RawClaims};
use crate::role::UserRole;

/// The only message a client ever sees for a rejected token.
pub const COULD_NOT_VALIDATE_USER: &str = "Could not validate user.";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed, expired or has an invalid signature")]
    InvalidToken,
    #[error("token is missing the subject or user id claim")]
    MissingClaims,
    #[error("token lifetime is out of range")]
    ExpiryOutOfRange,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues an access token for `username` that expires `ttl` from now.
pub fn create_access_token(
    username: &str,
    user_id: i64,
    role: UserRole,
    ttl: Duration,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let exp = Utc::now()
        .checked_add_signed(ttl)
        .ok_or(TokenError::ExpiryOutOfRange)?
        .timestamp()
        .max(0) as usize;

    let claims = Claims {
        sub: username.to_string(),
        id: user_id,
        role,
        exp,
    };

    encode(
        &Header::new(jwt_config.algorithm),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Validates signature, expiry and claim shape of `token`.
///
/// A missing `role` claim is read as [`UserRole::User`]; a role value this
/// service never issues makes the token invalid.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(jwt_config.algorithm);
    validation.leeway = 0;

    let raw = decode::<RawClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::InvalidToken)?;

    let (Some(sub), Some(id)) = (raw.sub, raw.id) else {
        return Err(TokenError::MissingClaims);
    };

    let role = match raw.role {
        Some(role) => role.parse().map_err(|_| TokenError::InvalidToken)?,
        None => UserRole::User,
    };

    Ok(Claims {
        sub,
        id,
        role,
        exp: raw.exp,
    })
}
