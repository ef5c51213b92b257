use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(format!("Invalid frequency: {}", s)),
        }
    }
}

/// How a completed recurring task's due date advances. Either a fixed day of
/// the week (0 = Sunday .. 6 = Saturday) or an interval of days, weeks, or
/// calendar months. The wire shape is validated here, at the boundary: a
/// malformed rule is rejected, never coerced to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum RecurrenceRule {
    Weekday { weekday: u8 },
    Every { frequency: Frequency, interval: u32 },
}

/// Loose wire shape: `{ "weekday": 0..6 }` or
/// `{ "frequency": "daily"|"weekly"|"monthly", "interval": n }`.
/// When both sets of fields are present, weekday takes precedence.
#[derive(Debug, Serialize, Deserialize)]
struct RawRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    weekday: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval: Option<u32>,
}

impl TryFrom<RawRule> for RecurrenceRule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        if let Some(weekday) = raw.weekday {
            if weekday > 6 {
                return Err(format!("Invalid weekday: {} (expected 0-6)", weekday));
            }
            return Ok(RecurrenceRule::Weekday { weekday });
        }

        match (raw.frequency, raw.interval) {
            (Some(freq), interval) => {
                let frequency = freq.parse()?;
                let interval = interval.unwrap_or(1);
                if interval == 0 {
                    return Err("Invalid interval: 0 (expected >= 1)".to_string());
                }
                Ok(RecurrenceRule::Every { frequency, interval })
            }
            (None, _) => Err("Recurrence rule must set either weekday or frequency".to_string()),
        }
    }
}

impl From<RecurrenceRule> for RawRule {
    fn from(rule: RecurrenceRule) -> Self {
        match rule {
            RecurrenceRule::Weekday { weekday } => RawRule {
                weekday: Some(weekday),
                frequency: None,
                interval: None,
            },
            RecurrenceRule::Every { frequency, interval } => RawRule {
                weekday: None,
                frequency: Some(frequency.to_string()),
                interval: Some(interval),
            },
        }
    }
}

/// Computes the due date a task should carry after being completed.
///
/// `now` is injected so the result is a pure function of its arguments. The
/// current due date's UTC time-of-day is preserved in every outcome; the new
/// calendar date is always counted from `now`, not from the (possibly stale)
/// current due date, so overdue recurring tasks resume from completion day.
///
/// - No current due date: returns `now` as-is.
/// - No rule: today's date, i.e. the one-off task is pulled back to today.
/// - Weekday rule: the next matching weekday strictly after today (a match
///   today lands a full week out, never today).
/// - Interval rule: today plus N days, N weeks, or N calendar months. Month
///   arithmetic clamps at month ends (Jan 31 + 1 month = Feb 28/29).
pub fn next_due_date(
    now: DateTime<Utc>,
    current_due: Option<DateTime<Utc>>,
    rule: Option<&RecurrenceRule>,
) -> DateTime<Utc> {
    let Some(due) = current_due else {
        return now;
    };

    let time = due.time();
    let today = now.date_naive();

    let date = match rule {
        None => today,
        Some(RecurrenceRule::Weekday { weekday }) => {
            let target = i64::from(*weekday);
            let current = i64::from(today.weekday().num_days_from_sunday());
            let mut days_ahead = (target - current).rem_euclid(7);
            if days_ahead == 0 {
                days_ahead = 7;
            }
            today + Duration::days(days_ahead)
        }
        Some(RecurrenceRule::Every { frequency, interval }) => match frequency {
            Frequency::Daily => today + Duration::days(i64::from(*interval)),
            Frequency::Weekly => today + Duration::days(7 * i64::from(*interval)),
            Frequency::Monthly => today
                .checked_add_months(Months::new(*interval))
                .unwrap_or(today),
        },
    };

    date.and_time(time).and_utc()
}
