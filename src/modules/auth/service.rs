use anyhow::anyhow;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

use todoapp_auth::UserRole;
use todoapp_core::{
    AppError, spawn_hash_password, spawn_verify_password, spawn_verify_unknown_account,
};

use crate::modules::users::model::{USER_COLUMNS, User};

use super::model::RegisterRequestDto;

pub const ALREADY_REGISTERED: &str = "Username or email already registered.";

#[derive(FromRow)]
struct UserCredentials {
    #[sqlx(flatten)]
    user: User,
    hashed_password: String,
}

pub struct AuthService;

impl AuthService {
    /// Creates an ordinary account. Admins only come from the CLI.
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let mut tx = db.begin().await?;

        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .fetch_one(&mut *tx)
        .await?;

        if taken {
            return Err(AppError::bad_request(anyhow!(ALREADY_REGISTERED)));
        }

        let hashed_password = spawn_hash_password(dto.password).await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, first_name, last_name, hashed_password, role, phone_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&hashed_password)
        .bind(UserRole::User.as_str())
        .bind(&dto.phone_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::bad_request(anyhow!(ALREADY_REGISTERED))
            }
            other => AppError::internal(other),
        })?;

        tx.commit().await?;
        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks `password` against the stored hash of `username`.
    ///
    /// `None` covers an unknown username, a wrong password and a disabled
    /// account alike; only store failures are errors.
    #[instrument(skip(db, password))]
    pub async fn authenticate(
        db: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(&format!(
            "SELECT {USER_COLUMNS}, hashed_password FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;

        let Some(UserCredentials {
            user,
            hashed_password,
        }) = credentials
        else {
            spawn_verify_unknown_account(password.to_owned()).await?;
            return Ok(None);
        };

        if !spawn_verify_password(password.to_owned(), hashed_password).await? {
            return Ok(None);
        }

        if !user.is_active {
            info!(user_id = user.id, "Login refused for disabled account");
            return Ok(None);
        }

        Ok(Some(user))
    }
}
