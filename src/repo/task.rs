use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::drag::TaskPatch;
use crate::engine::recurrence::RecurrenceRule;
use crate::error::{AppError, Result};
use crate::models::Task;

#[derive(Clone)]
pub struct TaskRepository {
    pool: Arc<SqlitePool>,
}

impl TaskRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        column_id: Uuid,
        title: &str,
        description: Option<&str>,
        position: Option<i32>,
        due_date: Option<DateTime<Utc>>,
        recurrence_rule: Option<RecurrenceRule>,
    ) -> Result<Task> {
        let id = Uuid::new_v4();

        let pos = match position {
            Some(p) => p,
            None => {
                let max_pos = sqlx::query_scalar::<_, Option<i32>>(
                    "SELECT MAX(position) FROM tasks WHERE column_id = $1",
                )
                .bind(column_id)
                .fetch_one(self.pool.as_ref())
                .await?;
                max_pos.unwrap_or(-1) + 1
            }
        };

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, column_id, title, description, position, is_completed, due_date, recurrence_rule, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7, datetime('now'), datetime('now'))
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(column_id)
        .bind(title)
        .bind(description)
        .bind(pos)
        .bind(due_date)
        .bind(recurrence_rule.map(Json))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(task)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(task)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Task> {
        self.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn list_by_column(&self, column_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE column_id = $1 ORDER BY position ASC",
        )
        .bind(column_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(tasks)
    }

    pub async fn list_all(&self) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.* FROM tasks t
            INNER JOIN columns col ON t.column_id = col.id
            ORDER BY col.position ASC, t.position ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(tasks)
    }

    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        is_completed: Option<bool>,
        due_date: Option<DateTime<Utc>>,
        recurrence_rule: Option<RecurrenceRule>,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_completed = COALESCE($4, is_completed),
                due_date = COALESCE($5, due_date),
                recurrence_rule = COALESCE($6, recurrence_rule),
                updated_at = datetime('now')
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(is_completed)
        .bind(due_date)
        .bind(recurrence_rule.map(Json))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(task)
    }

    /// Applies an engine-proposed partial update. Absent fields are left as
    /// they are.
    pub async fn apply_patch(&self, id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET column_id = COALESCE($2, column_id),
                position = COALESCE($3, position),
                is_completed = COALESCE($4, is_completed),
                due_date = COALESCE($5, due_date),
                updated_at = datetime('now')
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.column_id)
        .bind(patch.position)
        .bind(patch.is_completed)
        .bind(patch.due_date)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(task)
    }

    /// Single batch move used by the weekly pass: all listed tasks jump to
    /// the destination column in one statement.
    pub async fn move_to_column(&self, task_ids: &[Uuid], column_id: Uuid) -> Result<u64> {
        if task_ids.is_empty() {
            return Ok(0);
        }

        let placeholders: Vec<String> = (0..task_ids.len()).map(|i| format!("${}", i + 2)).collect();
        let query = format!(
            "UPDATE tasks SET column_id = $1, updated_at = datetime('now') WHERE id IN ({})",
            placeholders.join(",")
        );

        let mut q = sqlx::query(&query).bind(column_id);
        for task_id in task_ids {
            q = q.bind(task_id);
        }
        let result = q.execute(self.pool.as_ref()).await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
