use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, instrument, warn};

use todoapp_auth::{COULD_NOT_VALIDATE_USER, create_access_token};
use todoapp_core::AppError;

use crate::modules::ErrorResponse;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::validator::{ValidatedForm, ValidatedJson};

use super::model::{RegisterRequestDto, TokenRequest, TokenResponse};
use super::service::AuthService;

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Username or email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/auth/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Could not validate user", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn login_for_access_token(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = AuthService::authenticate(&state.db, &form.username, &form.password).await?;
    state.metrics.record_login(user.is_some());

    let Some(user) = user else {
        warn!("Login failed");
        return Err(AppError::unauthorized(COULD_NOT_VALIDATE_USER));
    };

    let access_token = create_access_token(
        &user.username,
        user.id,
        user.role,
        state.jwt_config.access_token_ttl(),
        &state.jwt_config,
    )
    .map_err(AppError::internal)?;

    state.metrics.record_token_issued();
    info!(user_id = user.id, "Access token issued");
    Ok(Json(TokenResponse::bearer(access_token)))
}
