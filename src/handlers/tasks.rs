use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::engine::drag::{resolve_drop, DropOutcome, DropTarget, TaskPatch};
use crate::engine::recurrence::next_due_date;
use crate::error::{AppError, Result};
use crate::handlers::board;
use crate::models::{CreateTask, MoveTask, TaskResponse, UpdateTask};
use crate::state::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    Path(column_id): Path<Uuid>,
    Json(input): Json<CreateTask>,
) -> Result<Json<TaskResponse>> {
    state.columns.get_by_id(column_id).await?;

    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Task title is required".to_string()));
    }

    let task = state
        .tasks
        .create(
            column_id,
            &input.title,
            input.description.as_deref(),
            input.position,
            input.due_date,
            input.recurrence_rule,
        )
        .await?;

    Ok(Json(task.into()))
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.list_all().await?;
    Ok(Json(tasks.into_iter().map(|t| t.into()).collect()))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>> {
    let task = state.tasks.get_by_id(task_id).await?;
    Ok(Json(task.into()))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<TaskResponse>> {
    state.tasks.get_by_id(task_id).await?;

    let task = state
        .tasks
        .update(
            task_id,
            input.title.as_deref(),
            input.description.as_deref(),
            input.is_completed,
            input.due_date,
            input.recurrence_rule,
        )
        .await?;

    Ok(Json(task.into()))
}

pub async fn delete_task(State(state): State<AppState>, Path(task_id): Path<Uuid>) -> Result<()> {
    state.tasks.delete(task_id).await?;
    Ok(())
}

/// Drag-transition endpoint. The engine decides against a snapshot; a
/// rejected drop is an advisory reason code (HTTP 200), not an error. A drop
/// into the done column completes the task, and a completed recurring task
/// is immediately re-armed with its next due date.
pub async fn move_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(input): Json<MoveTask>,
) -> Result<Json<Value>> {
    let snapshot = state.board_snapshot().await?;

    let target = input.target.map(|id| DropTarget {
        id,
        container: input.container,
    });

    let outcome = resolve_drop(&snapshot, task_id, target.as_ref(), input.started_revision);

    match outcome {
        DropOutcome::Rejected(reason) => {
            tracing::debug!("drop rejected for task {}: {}", task_id, reason.as_str());
            Ok(Json(json!({ "success": false, "reason": reason.as_str() })))
        }
        DropOutcome::NoOp => Ok(Json(json!({ "success": true }))),
        DropOutcome::Moved {
            patch, completed, ..
        } => {
            let mut task = state.tasks.apply_patch(task_id, &patch).await?;

            if completed {
                if let Some(rule) = task.recurrence_rule().copied() {
                    let next = next_due_date(Utc::now(), task.due_date, Some(&rule));
                    let rearm = TaskPatch {
                        is_completed: Some(false),
                        due_date: Some(next),
                        ..TaskPatch::default()
                    };
                    task = state.tasks.apply_patch(task_id, &rearm).await?;
                }
                board::reconcile_and_log(&state).await;
            }

            Ok(Json(json!({
                "success": true,
                "task": TaskResponse::from(task)
            })))
        }
    }
}
