pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod state;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Column routes
        .route("/columns", post(handlers::columns::create_column))
        .route("/columns", get(handlers::columns::list_columns))
        .route("/columns/{column_id}", get(handlers::columns::get_column))
        .route(
            "/columns/{column_id}",
            put(handlers::columns::update_column),
        )
        .route(
            "/columns/{column_id}",
            delete(handlers::columns::delete_column),
        )
        .route(
            "/columns/{column_id}/move",
            patch(handlers::columns::move_column),
        )
        // Task routes
        .route(
            "/columns/{column_id}/tasks",
            post(handlers::tasks::create_task),
        )
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/tasks/{task_id}", get(handlers::tasks::get_task))
        .route("/tasks/{task_id}", put(handlers::tasks::update_task))
        .route("/tasks/{task_id}", delete(handlers::tasks::delete_task))
        .route("/tasks/{task_id}/move", patch(handlers::tasks::move_task))
        // Board routes
        .route("/board/reconcile", post(handlers::board::reconcile));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod test_utils {
    use crate::config::Config;
    use crate::state::AppState;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    pub async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    pub async fn create_test_state() -> AppState {
        let pool = create_test_pool().await;
        AppState::new(pool, Config::default())
    }
}
