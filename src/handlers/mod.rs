pub mod board;
pub mod columns;
pub mod tasks;
