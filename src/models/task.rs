use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::engine::recurrence::RecurrenceRule;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub recurrence_rule: Option<Json<RecurrenceRule>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn recurrence_rule(&self) -> Option<&RecurrenceRule> {
        self.recurrence_rule.as_ref().map(|j| &j.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub recurrence_rule: Option<RecurrenceRule>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub recurrence_rule: Option<RecurrenceRule>,
}

/// Drag-transition request. `target` is the drop-target string from the
/// board UI (a column id, a "column-{id}" container id, or a task id);
/// `container` is the sortable container the target task was declared in,
/// when the drop landed on a task. `started_revision` is the dragged task's
/// `updated_at` as seen at drag start, used for the stale-state check.
#[derive(Debug, Deserialize)]
pub struct MoveTask {
    pub target: Option<String>,
    pub container: Option<String>,
    pub started_revision: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            column_id: task.column_id,
            title: task.title,
            description: task.description,
            position: task.position,
            is_completed: task.is_completed,
            due_date: task.due_date,
            recurrence_rule: task.recurrence_rule.map(|j| j.0),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
