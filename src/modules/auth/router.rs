use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login_for_access_token, register_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/token", post(login_for_access_token))
}
