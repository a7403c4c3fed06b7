use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use todoapp_auth::{COULD_NOT_VALIDATE_USER, Claims, TokenError, UserRole, verify_token};
use todoapp_config::JwtConfig;
use todoapp_core::AppError;

use crate::state::AppState;

/// The caller resolved from a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.id
    }

    pub fn username(&self) -> &str {
        &self.0.sub
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role.is_admin()
    }
}

/// Maps every token failure to the same client-facing error. The actual
/// reason is only logged.
pub fn reject_token(err: TokenError) -> AppError {
    debug!(reason = %err, "Rejected bearer token");
    AppError::unauthorized(COULD_NOT_VALIDATE_USER)
}

/// Resolves the caller behind `token`.
pub fn current_user(token: &str, jwt_config: &JwtConfig) -> Result<AuthUser, AppError> {
    verify_token(token, jwt_config)
        .map(AuthUser)
        .map_err(reject_token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::unauthorized(COULD_NOT_VALIDATE_USER))?;

        current_user(bearer.token(), &state.jwt_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use jsonwebtoken::Algorithm;
    use todoapp_auth::create_access_token;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
        }
    }

    #[test]
    fn test_current_user_from_valid_token() {
        let config = jwt_config();
        let token = create_access_token(
            "alice",
            42,
            UserRole::Admin,
            config.access_token_ttl(),
            &config,
        )
        .unwrap();

        let user = current_user(&token, &config).unwrap();
        assert_eq!(user.username(), "alice");
        assert_eq!(user.user_id(), 42);
        assert!(user.is_admin());
    }

    #[test]
    fn test_every_token_failure_looks_the_same() {
        let config = jwt_config();
        let expired = create_access_token(
            "alice",
            42,
            UserRole::User,
            chrono::Duration::seconds(-5),
            &config,
        )
        .unwrap();

        for token in ["garbage", expired.as_str()] {
            let err = current_user(token, &config).unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.detail(), COULD_NOT_VALIDATE_USER);
        }

        let missing = reject_token(TokenError::MissingClaims);
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.detail(), COULD_NOT_VALIDATE_USER);
    }
}
