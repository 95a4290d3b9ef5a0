//! Recurring task records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceSpec;

/// Kind of recurring task.
///
/// Both kinds share the period machinery; habits additionally count
/// entries within a period against an optional target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// Done once per period.
    Simple,
    /// Logged one or more times per period.
    Habit { target: Option<u32> },
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::Simple
    }
}

impl TaskKind {
    pub fn is_habit(&self) -> bool {
        matches!(self, TaskKind::Habit { .. })
    }

    pub fn target(&self) -> Option<u32> {
        match self {
            TaskKind::Habit { target } => *target,
            TaskKind::Simple => None,
        }
    }
}

/// A task with a repeating schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringTask {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub recurrence: RecurrenceSpec,
    #[serde(default)]
    pub kind: TaskKind,
    pub anchor_date: DateTime<Utc>,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RecurringTask {
    /// Create a simple recurring task anchored at `now`.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        recurrence: RecurrenceSpec,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            recurrence,
            kind: TaskKind::Simple,
            anchor_date: now,
            last_completed_at: None,
            created_at: now,
        }
    }

    /// Turn this task into a habit with the given per-period target.
    pub fn with_habit_target(mut self, target: Option<u32>) -> Self {
        self.kind = TaskKind::Habit { target };
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn habit_kind_serializes_with_tag() {
        let kind = TaskKind::Habit { target: Some(3) };
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, r#"{"type":"habit","target":3}"#);
        assert_eq!(kind.target(), Some(3));
        assert!(TaskKind::Simple.target().is_none());
    }

    #[test]
    fn missing_kind_defaults_to_simple() {
        let json = r#"{
            "id": "t1",
            "owner_id": "u1",
            "title": "Water plants",
            "recurrence": {"unit": "day", "frequency": 2},
            "anchor_date": "2024-01-01T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let task: RecurringTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.kind, TaskKind::Simple);
        assert!(task.last_completed_at.is_none());
    }

    #[test]
    fn new_task_is_anchored_at_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap();
        let task = RecurringTask::new("u1", "Stretch", RecurrenceSpec::daily(), now)
            .with_habit_target(Some(2));
        assert_eq!(task.anchor_date, now);
        assert!(task.kind.is_habit());
        assert!(!task.id.is_empty());
    }
}
