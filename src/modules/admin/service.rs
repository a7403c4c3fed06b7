use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use todoapp_core::AppError;

use crate::modules::users::model::{USER_COLUMNS, User};
use crate::modules::users::service::USER_NOT_FOUND;

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    /// Enables or disables an account. A disabled account can no longer
    /// obtain tokens; tokens already issued stay valid until they expire.
    #[instrument(skip(db))]
    pub async fn set_user_status(
        db: &PgPool,
        user_id: i64,
        is_active: bool,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
            .bind(is_active)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(USER_NOT_FOUND)));
        }

        tx.commit().await?;
        info!(user_id, is_active, "User status changed");
        Ok(())
    }
}
