use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::engine::BoardSnapshot;
use crate::error::Result;
use crate::repo::{ColumnRepository, TaskRepository};

#[derive(Clone)]
pub struct AppState {
    pub columns: ColumnRepository,
    pub tasks: TaskRepository,
    pub config: Arc<Config>,
    pub pool: Arc<SqlitePool>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let pool = Arc::new(pool);
        Self {
            columns: ColumnRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            config: Arc::new(config),
            pool,
        }
    }

    /// Captures the board as the engine sees it: all tasks, all columns,
    /// roles resolved once from the configured keywords.
    pub async fn board_snapshot(&self) -> Result<BoardSnapshot> {
        let tasks = self.tasks.list_all().await?;
        let columns = self.columns.list_all().await?;
        Ok(BoardSnapshot::new(tasks, columns, &self.config.roles))
    }
}
