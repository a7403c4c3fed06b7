use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

use super::controller::{delete_todo, read_all_todos, read_all_users, update_user_status};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/todo", get(read_all_todos))
        .route("/todo/{todo_id}", delete(delete_todo))
        .route("/users", get(read_all_users))
        .route("/users/{user_id}/status", put(update_user_status))
}
