pub mod column;
pub mod task;

pub use column::ColumnRepository;
pub use task::TaskRepository;
