//! Feature modules. Each one is laid out as `model` (rows and DTOs),
//! `service` (queries), `controller` (handlers) and `router`.

pub mod admin;
pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use serde::Serialize;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
