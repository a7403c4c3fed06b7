use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use todoapp_core::{AppError, spawn_hash_password, spawn_verify_password};

use super::model::{ChangePasswordDto, USER_COLUMNS, User};

pub const USER_NOT_FOUND: &str = "User not found.";
pub const PASSWORD_CHANGE_FAILED: &str = "Error on password change";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!(USER_NOT_FOUND)))
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: i64,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let stored: Option<String> =
            sqlx::query_scalar("SELECT hashed_password FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(stored) = stored else {
            return Err(AppError::unauthorized(PASSWORD_CHANGE_FAILED));
        };

        if !spawn_verify_password(dto.password, stored).await? {
            return Err(AppError::unauthorized(PASSWORD_CHANGE_FAILED));
        }

        let hashed_password = spawn_hash_password(dto.new_password).await?;

        sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
            .bind(&hashed_password)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(user_id, "Password changed");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn update_phone_number(
        db: &PgPool,
        user_id: i64,
        phone_number: &str,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query("UPDATE users SET phone_number = $1 WHERE id = $2")
            .bind(phone_number)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(USER_NOT_FOUND)));
        }

        tx.commit().await?;
        Ok(())
    }
}
