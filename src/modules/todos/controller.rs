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

use super::model::{Todo, TodoRequest};
use super::service::TodoService;

/// List the caller's todos
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "Todos owned by the caller", body = Vec<Todo>),
        (status = 401, description = "Could not validate user", body = ErrorResponse)
    ),
    tag = "Todos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn read_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = TodoService::list(&state.db, auth_user.user_id()).await?;
    Ok(Json(todos))
}

/// Get one of the caller's todos
#[utoipa::path(
    get,
    path = "/todos/todo/{todo_id}",
    params(("todo_id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse)
    ),
    tag = "Todos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn read_todo(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(todo_id): Path<i64>,
) -> Result<Json<Todo>, AppError> {
    let todo = TodoService::get(&state.db, todo_id, auth_user.user_id()).await?;
    Ok(Json(todo))
}

/// Create a todo owned by the caller
#[utoipa::path(
    post,
    path = "/todos/todo",
    request_body = TodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Todos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_todo(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<TodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = TodoService::create(&state.db, dto, auth_user.user_id()).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Replace one of the caller's todos
#[utoipa::path(
    put,
    path = "/todos/todo/{todo_id}",
    params(("todo_id" = i64, Path, description = "Todo id")),
    request_body = TodoRequest,
    responses(
        (status = 204, description = "Todo updated"),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Todos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_todo(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(todo_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<TodoRequest>,
) -> Result<StatusCode, AppError> {
    TodoService::update(&state.db, todo_id, dto, auth_user.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of the caller's todos
#[utoipa::path(
    delete,
    path = "/todos/todo/{todo_id}",
    params(("todo_id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Could not validate user", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse)
    ),
    tag = "Todos",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(todo_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    TodoService::delete(&state.db, todo_id, auth_user.user_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
