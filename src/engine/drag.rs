use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::snapshot::{BoardSnapshot, ColumnRole};

/// What the drop landed on: a raw target id from the board UI (a column id,
/// a "column-{id}" container id, or a task id), plus the sortable container
/// the target task was declared in, when there is one.
#[derive(Debug, Clone)]
pub struct DropTarget {
    pub id: String,
    pub container: Option<String>,
}

impl DropTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            container: None,
        }
    }

    pub fn with_container(id: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            container: Some(container.into()),
        }
    }
}

/// Partial update proposed by the engine. `None` fields are left untouched
/// by the caller's persistence call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub column_id: Option<Uuid>,
    pub position: Option<i32>,
    pub is_completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    NoTarget,
    TaskNotFound,
    StaleState,
    RecurrentBlocked,
}

impl DropRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropRejection::NoTarget => "no_target",
            DropRejection::TaskNotFound => "task_not_found",
            DropRejection::StaleState => "stale_state",
            DropRejection::RecurrentBlocked => "recurrent_blocked",
        }
    }
}

/// Outcome of a drop. Rejections are advisory codes for user feedback, not
/// errors; `completed` flags the one integration point where the caller
/// should recompute recurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Moved {
        task_id: Uuid,
        patch: TaskPatch,
        completed: bool,
    },
    NoOp,
    Rejected(DropRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        task_id: Uuid,
        started_revision: Option<DateTime<Utc>>,
        hovered_column: Option<Uuid>,
    },
}

/// Single-gesture drag lifecycle. One pointer, one drag at a time; every
/// terminal event returns the controller to `Idle`.
#[derive(Debug)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Begins a gesture, recording the task's `updated_at` as the revision
    /// for the stale-state check at drop time.
    pub fn drag_start(&mut self, snapshot: &BoardSnapshot, task_id: Uuid) {
        let started_revision = snapshot.task(task_id).map(|t| t.updated_at);
        self.state = DragState::Dragging {
            task_id,
            started_revision,
            hovered_column: None,
        };
    }

    /// Updates the hovered column from an intermediate drop target.
    /// Successive calls coalesce (last write wins); this value is cosmetic
    /// and `drag_end` re-resolves from its own target.
    pub fn drag_over(&mut self, snapshot: &BoardSnapshot, target: &str) -> Option<Uuid> {
        let resolved = resolve_column_target(snapshot, target);
        if let DragState::Dragging { hovered_column, .. } = &mut self.state {
            *hovered_column = resolved;
        }
        resolved
    }

    pub fn hovered_column(&self) -> Option<Uuid> {
        match self.state {
            DragState::Dragging { hovered_column, .. } => hovered_column,
            DragState::Idle => None,
        }
    }

    pub fn drag_end(
        &mut self,
        snapshot: &BoardSnapshot,
        task_id: Uuid,
        target: Option<&DropTarget>,
    ) -> DropOutcome {
        let started_revision = match self.state {
            DragState::Dragging {
                started_revision, ..
            } => started_revision,
            DragState::Idle => None,
        };
        self.state = DragState::Idle;
        resolve_drop(snapshot, task_id, target, started_revision)
    }

    pub fn drag_cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Resolves a raw target string to a column id: a column id directly, a
/// "column-{id}" container id, or a task id standing in for its column.
fn resolve_column_target(snapshot: &BoardSnapshot, target: &str) -> Option<Uuid> {
    if let Ok(id) = Uuid::parse_str(target) {
        if snapshot.column(id).is_some() {
            return Some(id);
        }
    }
    if let Some(stripped) = target.strip_prefix("column-") {
        if let Ok(id) = Uuid::parse_str(stripped) {
            if snapshot.column(id).is_some() {
                return Some(id);
            }
        }
    }
    if let Ok(id) = Uuid::parse_str(target) {
        if let Some(task) = snapshot.task(id) {
            return Some(task.column_id);
        }
    }
    None
}

/// Decides a drop. Pure over the snapshot; the returned patch is the only
/// proposed mutation and the caller persists it (or not).
pub fn resolve_drop(
    snapshot: &BoardSnapshot,
    task_id: Uuid,
    target: Option<&DropTarget>,
    started_revision: Option<DateTime<Utc>>,
) -> DropOutcome {
    let Some(target) = target else {
        return DropOutcome::Rejected(DropRejection::NoTarget);
    };

    let Some(task) = snapshot.task(task_id) else {
        return DropOutcome::Rejected(DropRejection::TaskNotFound);
    };

    if let Some(revision) = started_revision {
        if task.updated_at != revision {
            return DropOutcome::Rejected(DropRejection::StaleState);
        }
    }

    // Destination: direct column target; for a task target prefer its
    // declared sortable container, else the target task's own column; final
    // fallback is the source column (a no-op).
    let direct = resolve_direct_column(snapshot, &target.id);
    let destination = direct
        .or_else(|| {
            let target_task = Uuid::parse_str(&target.id)
                .ok()
                .and_then(|id| snapshot.task(id))?;
            target
                .container
                .as_deref()
                .and_then(|c| resolve_direct_column(snapshot, c))
                .or(Some(target_task.column_id))
        })
        .unwrap_or(task.column_id);

    if task.recurrence_rule().is_some()
        && snapshot.column_role(task.column_id) == ColumnRole::Recurring
        && destination != task.column_id
    {
        return DropOutcome::Rejected(DropRejection::RecurrentBlocked);
    }

    if destination == task.column_id {
        return DropOutcome::NoOp;
    }

    let mut patch = TaskPatch {
        column_id: Some(destination),
        position: Some(snapshot.task_count_in(destination) as i32),
        ..TaskPatch::default()
    };

    let mut completed = false;
    if snapshot.column_role(destination) == ColumnRole::Done {
        patch.is_completed = Some(true);
        completed = true;
    } else if snapshot.column_role(task.column_id) == ColumnRole::Done {
        patch.is_completed = Some(false);
    }

    DropOutcome::Moved {
        task_id,
        patch,
        completed,
    }
}

/// Steps (a) and (b) of target resolution only: column id or "column-{id}".
fn resolve_direct_column(snapshot: &BoardSnapshot, target: &str) -> Option<Uuid> {
    if let Ok(id) = Uuid::parse_str(target) {
        if snapshot.column(id).is_some() {
            return Some(id);
        }
    }
    target
        .strip_prefix("column-")
        .and_then(|s| Uuid::parse_str(s).ok())
        .filter(|id| snapshot.column(*id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoleKeywords;
    use crate::engine::recurrence::{Frequency, RecurrenceRule};
    use crate::models::{Column, Task};
    use chrono::TimeZone;
    use sqlx::types::Json;

    fn column(name: &str, position: i32) -> Column {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
        Column {
            id: Uuid::new_v4(),
            name: name.to_string(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(column_id: Uuid, title: &str, rule: Option<RecurrenceRule>) -> Task {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap();
        Task {
            id: Uuid::new_v4(),
            column_id,
            title: title.to_string(),
            description: None,
            position: 0,
            is_completed: false,
            due_date: None,
            recurrence_rule: rule.map(Json),
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(tasks: Vec<Task>, columns: Vec<Column>) -> BoardSnapshot {
        BoardSnapshot::new(tasks, columns, &RoleKeywords::default())
    }

    #[test]
    fn missing_target_is_rejected() {
        let col = column("Backlog", 0);
        let t = task(col.id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![col]);

        let outcome = resolve_drop(&snap, task_id, None, None);
        assert_eq!(outcome, DropOutcome::Rejected(DropRejection::NoTarget));
    }

    #[test]
    fn unknown_task_is_rejected() {
        let col = column("Backlog", 0);
        let snap = snapshot(vec![], vec![col]);

        let target = DropTarget::new(Uuid::new_v4().to_string());
        let outcome = resolve_drop(&snap, Uuid::new_v4(), Some(&target), None);
        assert_eq!(outcome, DropOutcome::Rejected(DropRejection::TaskNotFound));
    }

    #[test]
    fn drop_on_same_column_is_a_noop() {
        let col = column("Backlog", 0);
        let col_id = col.id;
        let t = task(col_id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![col]);

        let target = DropTarget::new(col_id.to_string());
        let outcome = resolve_drop(&snap, task_id, Some(&target), None);
        assert_eq!(outcome, DropOutcome::NoOp);
    }

    #[test]
    fn cross_column_drop_appends_to_destination() {
        let src = column("Backlog", 0);
        let dst = column("Em Andamento", 1);
        let dst_id = dst.id;
        let dragged = task(src.id, "dragged", None);
        let task_id = dragged.id;
        let existing_a = task(dst_id, "x", None);
        let existing_b = task(dst_id, "y", None);
        let snap = snapshot(vec![dragged, existing_a, existing_b], vec![src, dst]);

        let target = DropTarget::new(dst_id.to_string());
        let outcome = resolve_drop(&snap, task_id, Some(&target), None);
        match outcome {
            DropOutcome::Moved {
                patch, completed, ..
            } => {
                assert_eq!(patch.column_id, Some(dst_id));
                assert_eq!(patch.position, Some(2));
                assert_eq!(patch.is_completed, None);
                assert!(!completed);
            }
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn target_resolution_handles_prefixed_and_task_targets() {
        let src = column("Backlog", 0);
        let dst = column("Em Andamento", 1);
        let dst_id = dst.id;
        let dragged = task(src.id, "dragged", None);
        let task_id = dragged.id;
        let occupant = task(dst_id, "occupant", None);
        let occupant_id = occupant.id;
        let snap = snapshot(vec![dragged, occupant], vec![src, dst]);

        // Synthetic container id.
        let target = DropTarget::new(format!("column-{}", dst_id));
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved { patch, .. } => assert_eq!(patch.column_id, Some(dst_id)),
            other => panic!("expected Moved, got {:?}", other),
        }

        // Dropping onto a task resolves to that task's column.
        let target = DropTarget::new(occupant_id.to_string());
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved { patch, .. } => assert_eq!(patch.column_id, Some(dst_id)),
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn declared_container_wins_over_target_tasks_column() {
        let src = column("Backlog", 0);
        let dst = column("Em Andamento", 1);
        let third = column("Ideias", 2);
        let third_id = third.id;
        let dragged = task(src.id, "dragged", None);
        let task_id = dragged.id;
        let occupant = task(dst.id, "occupant", None);
        let occupant_id = occupant.id;
        let snap = snapshot(vec![dragged, occupant], vec![src, dst, third]);

        let target = DropTarget::with_container(occupant_id.to_string(), third_id.to_string());
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved { patch, .. } => assert_eq!(patch.column_id, Some(third_id)),
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn unresolvable_target_falls_back_to_source_column() {
        let col = column("Backlog", 0);
        let t = task(col.id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![col]);

        let target = DropTarget::new("garbage");
        let outcome = resolve_drop(&snap, task_id, Some(&target), None);
        assert_eq!(outcome, DropOutcome::NoOp);
    }

    #[test]
    fn recurring_task_cannot_leave_its_anchor_column() {
        let anchor = column("Recorrente", 0);
        let other = column("Backlog", 1);
        let other_id = other.id;
        let rule = RecurrenceRule::Every {
            frequency: Frequency::Daily,
            interval: 1,
        };
        let t = task(anchor.id, "habit", Some(rule));
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![anchor, other]);

        let target = DropTarget::new(other_id.to_string());
        let outcome = resolve_drop(&snap, task_id, Some(&target), None);
        assert_eq!(
            outcome,
            DropOutcome::Rejected(DropRejection::RecurrentBlocked)
        );
    }

    #[test]
    fn recurring_task_without_rule_may_leave_recurring_column() {
        let anchor = column("Recorrente", 0);
        let other = column("Backlog", 1);
        let other_id = other.id;
        let t = task(anchor.id, "one-off", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![anchor, other]);

        let target = DropTarget::new(other_id.to_string());
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved { patch, .. } => assert_eq!(patch.column_id, Some(other_id)),
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn dropping_into_done_completes_the_task() {
        let src = column("Backlog", 0);
        let done = column("Concluído", 1);
        let done_id = done.id;
        let t = task(src.id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![src, done]);

        let target = DropTarget::new(done_id.to_string());
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved {
                patch, completed, ..
            } => {
                assert_eq!(patch.is_completed, Some(true));
                assert!(completed);
            }
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn dragging_out_of_done_uncompletes_the_task() {
        let done = column("Concluído", 0);
        let src_id = done.id;
        let other = column("Backlog", 1);
        let other_id = other.id;
        let mut t = task(src_id, "a", None);
        t.is_completed = true;
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![done, other]);

        let target = DropTarget::new(other_id.to_string());
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved {
                patch, completed, ..
            } => {
                assert_eq!(patch.is_completed, Some(false));
                assert!(!completed);
            }
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn move_between_plain_columns_leaves_completion_untouched() {
        let a = column("Backlog", 0);
        let b = column("Em Andamento", 1);
        let b_id = b.id;
        let t = task(a.id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![a, b]);

        let target = DropTarget::new(b_id.to_string());
        match resolve_drop(&snap, task_id, Some(&target), None) {
            DropOutcome::Moved { patch, .. } => assert_eq!(patch.is_completed, None),
            other => panic!("expected Moved, got {:?}", other),
        }
    }

    #[test]
    fn stale_revision_is_rejected() {
        let src = column("Backlog", 0);
        let dst = column("Em Andamento", 1);
        let dst_id = dst.id;
        let t = task(src.id, "a", None);
        let task_id = t.id;
        let stale = t.updated_at - chrono::Duration::seconds(30);
        let snap = snapshot(vec![t], vec![src, dst]);

        let target = DropTarget::new(dst_id.to_string());
        let outcome = resolve_drop(&snap, task_id, Some(&target), Some(stale));
        assert_eq!(outcome, DropOutcome::Rejected(DropRejection::StaleState));
    }

    #[test]
    fn controller_lifecycle_tracks_hover_and_returns_to_idle() {
        let src = column("Backlog", 0);
        let dst = column("Em Andamento", 1);
        let dst_id = dst.id;
        let t = task(src.id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t], vec![src, dst]);

        let mut drag = DragController::new();
        assert_eq!(drag.state(), DragState::Idle);

        drag.drag_start(&snap, task_id);
        assert!(matches!(drag.state(), DragState::Dragging { .. }));

        // Hover coalesces to the last target seen.
        drag.drag_over(&snap, "garbage");
        drag.drag_over(&snap, &dst_id.to_string());
        assert_eq!(drag.hovered_column(), Some(dst_id));

        let target = DropTarget::new(dst_id.to_string());
        let outcome = drag.drag_end(&snap, task_id, Some(&target));
        assert!(matches!(outcome, DropOutcome::Moved { .. }));
        assert_eq!(drag.state(), DragState::Idle);

        drag.drag_start(&snap, task_id);
        drag.drag_cancel();
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn controller_stale_check_uses_revision_from_drag_start() {
        let src = column("Backlog", 0);
        let dst = column("Em Andamento", 1);
        let dst_id = dst.id;
        let t = task(src.id, "a", None);
        let task_id = t.id;
        let snap = snapshot(vec![t.clone()], vec![src.clone(), dst.clone()]);

        let mut drag = DragController::new();
        drag.drag_start(&snap, task_id);

        // The task row changes under the gesture.
        let mut changed = t;
        changed.updated_at = changed.updated_at + chrono::Duration::seconds(5);
        let snap_after = snapshot(vec![changed], vec![src, dst]);

        let target = DropTarget::new(dst_id.to_string());
        let outcome = drag.drag_end(&snap_after, task_id, Some(&target));
        assert_eq!(outcome, DropOutcome::Rejected(DropRejection::StaleState));
    }
}
