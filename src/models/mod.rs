pub mod column;
pub mod task;

pub use column::{Column, ColumnResponse, CreateColumn, MoveColumn, UpdateColumn};
pub use task::{CreateTask, MoveTask, Task, TaskResponse, UpdateTask};
