use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use todoapp_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::ErrorResponse;
use crate::modules::todos::model::Todo;
use crate::modules::todos::service::TodoService;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::UpdateUserStatusDto;
use super::service::AdminService;

/// List every todo
#[utoipa::path(
    get,
    path = "/admin/todo",
    responses(
        (status = 200, description = "All todos", body = Vec<Todo>),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user_id()))]
pub async fn read_all_todos(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = TodoService::list_all(&state.db).await?;
    Ok(Json(todos))
}

/// Delete any todo
#[utoipa::path(
    delete,
    path = "/admin/todo/{todo_id}",
    params(("todo_id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user_id()))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(todo_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    TodoService::delete_any(&state.db, todo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List every user
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user_id()))]
pub async fn read_all_users(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = AdminService::list_users(&state.db).await?;
    Ok(Json(users))
}

/// Enable or disable a user account
#[utoipa::path(
    put,
    path = "/admin/users/{user_id}/status",
    params(("user_id" = i64, Path, description = "User id")),
    request_body = UpdateUserStatusDto,
    responses(
        (status = 204, description = "Status changed"),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user_id()))]
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserStatusDto>,
) -> Result<StatusCode, AppError> {
    AdminService::set_user_status(&state.db, user_id, dto.is_active).await?;
    Ok(StatusCode::NO_CONTENT)
}
