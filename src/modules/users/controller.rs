use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use todoapp_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{ChangePasswordDto, MAX_PHONE_NUMBER_LEN, PHONE_NUMBER_TOO_LONG, User};
use super::service::UserService;

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Could not validate user", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, auth_user.user_id()).await?;
    Ok(Json(user))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/users/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Wrong current password or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<StatusCode, AppError> {
    UserService::change_password(&state.db, auth_user.user_id(), dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the caller's phone number
#[utoipa::path(
    put,
    path = "/users/phonenumber/{phone_number}",
    params(("phone_number" = String, Path, description = "New phone number")),
    responses(
        (status = 204, description = "Phone number updated"),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 422, description = "Phone number too long", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn change_phone_number(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(phone_number): Path<String>,
) -> Result<StatusCode, AppError> {
    if phone_number.chars().count() > MAX_PHONE_NUMBER_LEN {
        return Err(AppError::unprocessable(anyhow::anyhow!(PHONE_NUMBER_TOO_LONG)));
    }

    UserService::update_phone_number(&state.db, auth_user.user_id(), &phone_number).await?;
    Ok(StatusCode::NO_CONTENT)
}
