use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ColumnResponse, CreateColumn, MoveColumn, UpdateColumn};
use crate::state::AppState;

pub async fn create_column(
    State(state): State<AppState>,
    Json(input): Json<CreateColumn>,
) -> Result<Json<ColumnResponse>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Column name is required".to_string()));
    }

    let column = state.columns.create(&input.name, input.position).await?;

    Ok(Json(column.into()))
}

pub async fn list_columns(State(state): State<AppState>) -> Result<Json<Vec<ColumnResponse>>> {
    let columns = state.columns.list_all().await?;
    Ok(Json(columns.into_iter().map(|c| c.into()).collect()))
}

pub async fn get_column(
    State(state): State<AppState>,
    Path(column_id): Path<Uuid>,
) -> Result<Json<ColumnResponse>> {
    let column = state.columns.get_by_id(column_id).await?;
    Ok(Json(column.into()))
}

pub async fn update_column(
    State(state): State<AppState>,
    Path(column_id): Path<Uuid>,
    Json(input): Json<UpdateColumn>,
) -> Result<Json<ColumnResponse>> {
    state.columns.get_by_id(column_id).await?;

    let updated = state
        .columns
        .update(column_id, input.name.as_deref())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_column(
    State(state): State<AppState>,
    Path(column_id): Path<Uuid>,
) -> Result<()> {
    state.columns.delete(column_id).await?;
    Ok(())
}

pub async fn move_column(
    State(state): State<AppState>,
    Path(column_id): Path<Uuid>,
    Json(input): Json<MoveColumn>,
) -> Result<Json<ColumnResponse>> {
    let updated = state.columns.move_column(column_id, input.position).await?;
    Ok(Json(updated.into()))
}
