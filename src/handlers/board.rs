use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::engine::weekly::select_for_current_week;
use crate::error::Result;
use crate::state::AppState;

/// Runs the weekly pass: moves open tasks due this week into the
/// current-week column. Returns the number of tasks moved. No-op when
/// auto-move is disabled or no current-week column exists.
pub async fn run_reconcile(state: &AppState) -> Result<u64> {
    if !state.config.auto_move.enabled {
        return Ok(0);
    }

    let snapshot = state.board_snapshot().await?;

    let Some(week_move) = select_for_current_week(
        Utc::now(),
        &snapshot,
        &state.config.auto_move.exclude_columns,
    ) else {
        return Ok(0);
    };

    let moved = state
        .tasks
        .move_to_column(&week_move.task_ids, week_move.destination)
        .await?;

    if moved > 0 {
        tracing::info!("moved {} tasks into the current-week column", moved);
    }

    Ok(moved)
}

/// Fire-and-forget variant for the startup pass and post-completion
/// triggers: a failed batch update is logged and swallowed, never retried.
pub async fn reconcile_and_log(state: &AppState) {
    if let Err(e) = run_reconcile(state).await {
        tracing::warn!("weekly reconcile failed: {}", e);
    }
}

pub async fn reconcile(State(state): State<AppState>) -> Result<Json<Value>> {
    let moved = run_reconcile(&state).await?;
    Ok(Json(json!({ "moved": moved })))
}
