use chrono::{DateTime, NaiveDate, Utc, Weekday};
use uuid::Uuid;

use super::snapshot::{BoardSnapshot, ColumnRole};

/// Batch move proposed by the weekly pass: every listed task goes to the
/// destination column. No positions are assigned on this path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekMove {
    pub destination: Uuid,
    pub task_ids: Vec<Uuid>,
}

/// Monday through Sunday of the week containing `now`, inclusive.
pub fn week_bounds(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let week = now.date_naive().week(Weekday::Mon);
    (week.first_day(), week.last_day())
}

/// Selects the tasks due this week that should migrate into the
/// current-week column. Returns `None` when there is no current-week column
/// or nothing qualifies.
///
/// A task qualifies when it is not already in the destination, not in a
/// column whose name matches an exclusion fragment, not completed, and its
/// due date falls inside this week's Monday-Sunday window.
pub fn select_for_current_week(
    now: DateTime<Utc>,
    snapshot: &BoardSnapshot,
    exclude_columns: &[String],
) -> Option<WeekMove> {
    let destination = snapshot.column_with_role(ColumnRole::CurrentWeek)?.id;

    let excluded: Vec<Uuid> = snapshot
        .columns()
        .iter()
        .filter(|c| {
            let lower = c.name.to_lowercase();
            exclude_columns
                .iter()
                .any(|frag| !frag.is_empty() && lower.contains(&frag.to_lowercase()))
        })
        .map(|c| c.id)
        .collect();

    let (week_start, week_end) = week_bounds(now);

    let task_ids: Vec<Uuid> = snapshot
        .tasks()
        .iter()
        .filter(|t| t.column_id != destination)
        .filter(|t| !excluded.contains(&t.column_id))
        .filter(|t| !t.is_completed)
        .filter(|t| {
            t.due_date
                .map(|due| {
                    let date = due.date_naive();
                    date >= week_start && date <= week_end
                })
                .unwrap_or(false)
        })
        .map(|t| t.id)
        .collect();

    if task_ids.is_empty() {
        return None;
    }

    Some(WeekMove {
        destination,
        task_ids,
    })
}
