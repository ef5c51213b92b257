use uuid::Uuid;

use crate::config::RoleKeywords;
use crate::models::{Column, Task};

/// Role a column plays on the board. Resolved once per snapshot from the
/// column name via the configured keyword lists; transition decisions match
/// on the role, never on the raw name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Backlog,
    InProgress,
    Done,
    CurrentWeek,
    Recurring,
    Custom,
}

impl ColumnRole {
    pub fn resolve(name: &str, keywords: &RoleKeywords) -> Self {
        let lower = name.to_lowercase();
        let matches = |kws: &[String]| kws.iter().any(|k| lower.contains(&k.to_lowercase()));

        if matches(&keywords.done) {
            ColumnRole::Done
        } else if matches(&keywords.current_week) {
            ColumnRole::CurrentWeek
        } else if matches(&keywords.recurring) {
            ColumnRole::Recurring
        } else if matches(&keywords.in_progress) {
            ColumnRole::InProgress
        } else if matches(&keywords.backlog) {
            ColumnRole::Backlog
        } else {
            ColumnRole::Custom
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotColumn {
    pub id: Uuid,
    pub name: String,
    pub position: i32,
    pub role: ColumnRole,
}

/// Immutable view of the board captured for one decision. The engine never
/// sees live collections, so a store mutation mid-gesture is only visible
/// through the revision check in the drag reducer.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    tasks: Vec<Task>,
    columns: Vec<SnapshotColumn>,
}

impl BoardSnapshot {
    pub fn new(tasks: Vec<Task>, columns: Vec<Column>, keywords: &RoleKeywords) -> Self {
        let columns = columns
            .into_iter()
            .map(|c| SnapshotColumn {
                role: ColumnRole::resolve(&c.name, keywords),
                id: c.id,
                name: c.name,
                position: c.position,
            })
            .collect();
        Self { tasks, columns }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn columns(&self) -> &[SnapshotColumn] {
        &self.columns
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn column(&self, id: Uuid) -> Option<&SnapshotColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_role(&self, id: Uuid) -> ColumnRole {
        self.column(id).map(|c| c.role).unwrap_or(ColumnRole::Custom)
    }

    pub fn column_with_role(&self, role: ColumnRole) -> Option<&SnapshotColumn> {
        self.columns.iter().find(|c| c.role == role)
    }

    pub fn task_count_in(&self, column_id: Uuid) -> usize {
        self.tasks.iter().filter(|t| t.column_id == column_id).count()
    }
}
