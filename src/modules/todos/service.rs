use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use todoapp_core::AppError;

use super::model::{Todo, TodoRequest};

pub const TODO_NOT_FOUND: &str = "Todo not found.";

fn todo_not_found() -> AppError {
    AppError::not_found(anyhow!(TODO_NOT_FOUND))
}

/// Todo storage, always scoped to one owner. A row owned by someone else is
/// reported exactly like a missing one.
pub struct TodoService;

impl TodoService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, owner_id: i64) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, priority, complete, owner_id
             FROM todos WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;

        Ok(todos)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, todo_id: i64, owner_id: i64) -> Result<Todo, AppError> {
        sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, priority, complete, owner_id
             FROM todos WHERE id = $1 AND owner_id = $2",
        )
        .bind(todo_id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(todo_not_found)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: TodoRequest, owner_id: i64) -> Result<Todo, AppError> {
        let mut tx = db.begin().await?;

        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, description, priority, complete, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, description, priority, complete, owner_id",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.priority)
        .bind(dto.complete)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(todo_id = todo.id, owner_id, "Todo created");
        Ok(todo)
    }

    /// Replaces every mutable field in one statement.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        todo_id: i64,
        dto: TodoRequest,
        owner_id: i64,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query(
            "UPDATE todos SET title = $1, description = $2, priority = $3, complete = $4
             WHERE id = $5 AND owner_id = $6",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.priority)
        .bind(dto.complete)
        .bind(todo_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(todo_not_found());
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, todo_id: i64, owner_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(todo_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(todo_not_found());
        }

        tx.commit().await?;
        info!(todo_id, owner_id, "Todo deleted");
        Ok(())
    }

    /// Every todo of every owner.
    #[instrument(skip(db))]
    pub async fn list_all(db: &PgPool) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, priority, complete, owner_id
             FROM todos ORDER BY id",
        )
        .fetch_all(db)
        .await?;

        Ok(todos)
    }

    /// Deletes a todo regardless of its owner.
    #[instrument(skip(db))]
    pub async fn delete_any(db: &PgPool, todo_id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(todo_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(todo_not_found());
        }

        tx.commit().await?;
        info!(todo_id, "Todo deleted by admin");
        Ok(())
    }
}
