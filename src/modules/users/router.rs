use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{change_password, change_phone_number, get_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user))
        .route("/password", put(change_password))
        .route("/phonenumber/{phone_number}", put(change_phone_number))
}
