//! # Todo API DB
//!
//! PostgreSQL pool construction and the embedded schema migrations.
//!
//! The schema itself lives in the workspace `migrations/` directory and is
//! managed with `sqlx migrate`. [`MIGRATOR`] embeds the same files so the
//! server can bring a fresh database up to date on boot.
//!
//! # Example
//!
//! ```ignore
//! use todoapp_config::Settings;
//! use todoapp_db::{init_db_pool, run_migrations};
//!
//! let settings = Settings::from_env()?;
//! let pool = init_db_pool(&settings.database).await?;
//! run_migrations(&pool).await?;
//! ```

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use todoapp_config::DatabaseConfig;
use tracing::info;

pub use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a connection pool against `config.url`.
///
/// The pool is cheaply cloneable; build it once at startup and share it
/// through the application state.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
