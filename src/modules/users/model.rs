use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use todoapp_auth::UserRole;

/// Columns selected whenever a [`User`] is loaded. The password hash is never
/// part of it.
pub const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, phone_number, is_active";

/// Width of the `phone_number` column.
pub const MAX_PHONE_NUMBER_LEN: usize = 32;

pub const PHONE_NUMBER_TOO_LONG: &str = "Phone number must be at most 32 characters";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}
