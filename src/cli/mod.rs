use anyhow::{Context, bail};
use sqlx::PgPool;

use todoapp_auth::UserRole;
use todoapp_core::hash_password;

pub struct NewAdmin<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

/// Inserts an admin account and returns its id.
pub async fn create_admin(db: &PgPool, admin: NewAdmin<'_>) -> anyhow::Result<i64> {
    if admin.password.len() < 6 {
        bail!("Password must be at least 6 characters");
    }

    let hashed_password =
        hash_password(admin.password).map_err(|e| anyhow::anyhow!("{:#}", e.error))?;

    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO users (username, email, first_name, last_name, hashed_password, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(admin.username)
    .bind(admin.email)
    .bind(admin.first_name)
    .bind(admin.last_name)
    .bind(hashed_password)
    .bind(UserRole::Admin.as_str())
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    match id {
        Some(id) => Ok(id),
        None => bail!("A user with this username or email already exists"),
    }
}
