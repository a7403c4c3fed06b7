use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
    pub owner_id: i64,
}

/// Body of create and full-replace update. Ownership is never taken from
/// the payload.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct TodoRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be 3 to 255 characters"))]
    pub title: String,
    #[validate(length(
        min = 3,
        max = 100,
        message = "Description must be 3 to 100 characters"
    ))]
    pub description: String,
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: i32,
    pub complete: bool,
}
