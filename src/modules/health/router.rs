use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{health_check, redirect_to_todo_page};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(redirect_to_todo_page))
        .route("/health", get(health_check))
}
