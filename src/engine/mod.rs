//! Pure decision logic for the board: recurrence scheduling, drag
//! transitions, and the weekly auto-move selection. Everything here reads
//! snapshots and returns proposed mutations; persistence is the caller's job.

pub mod drag;
pub mod recurrence;
pub mod snapshot;
pub mod weekly;

pub use drag::{DragController, DropOutcome, DropRejection, DropTarget, TaskPatch};
pub use recurrence::{next_due_date, Frequency, RecurrenceRule};
pub use snapshot::{BoardSnapshot, ColumnRole};
pub use weekly::{select_for_current_week, week_bounds, WeekMove};
