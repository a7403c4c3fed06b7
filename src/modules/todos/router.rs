use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeFile;

use crate::state::AppState;

use super::controller::{create_todo, delete_todo, read_all, read_todo, update_todo};

pub const TODO_PAGE: &str = "static/todo.html";

pub fn init_todos_router() -> Router<AppState> {
    Router::new()
        .route("/", get(read_all))
        .route("/todo", post(create_todo))
        .route(
            "/todo/{todo_id}",
            get(read_todo).put(update_todo).delete(delete_todo),
        )
        .route_service("/todo-page", ServeFile::new(TODO_PAGE))
}
