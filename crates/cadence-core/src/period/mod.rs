//! Periods and entries.
//!
//! A [`Period`] is the bounded window during which a recurring task can be
//! completed once. At most one period per task is active at any time, and a
//! closed period is never reopened: reactivation always creates a new one.
//!
//! ```text
//!   (created) ──> open ──complete──> completed (still active)
//!                  │                       │
//!                  │ window elapsed        │ window elapsed
//!                  v                       v
//!               finalized <────────────────┘ ──> successor period created
//! ```
//!
//! Windows start on unit boundaries aligned to the task's anchor. Windows
//! that pass with no interaction are recorded as finalized periods with no
//! entries when the task is next touched.

pub mod calculator;
pub mod lifecycle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceUnit;

pub use calculator::{is_same_day, next_period_start, start_of_day, window_end, window_start_at};
pub use lifecycle::{CompletedPeriod, PeriodLifecycleManager, PeriodTransition, Rollover};

/// A stored period window for one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    pub id: String,
    pub task_id: String,
    /// Copied from the task at creation and never changed afterwards.
    pub unit: RecurrenceUnit,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_active: bool,
    /// Habit entries logged in this window.
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub target: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Period {
    /// Completion progress in percent, 0 when the period has no target.
    pub fn progress(&self) -> f64 {
        match self.target {
            Some(target) if target > 0 => {
                (f64::from(self.count) / f64::from(target)).min(1.0) * 100.0
            }
            _ => 0.0,
        }
    }

    /// Whether the logged count satisfies the period's target.
    ///
    /// A period without a target is satisfied by its first entry.
    pub fn target_reached(&self) -> bool {
        match self.target {
            Some(target) => self.count >= target,
            None => self.count > 0,
        }
    }
}

/// Descriptor for a period a store should create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPeriod {
    pub task_id: String,
    pub unit: RecurrenceUnit,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub target: Option<u32>,
}

impl NewPeriod {
    pub fn into_period(self, id: String, now: DateTime<Utc>) -> Period {
        Period {
            id,
            task_id: self.task_id,
            unit: self.unit,
            start_date: self.start_date,
            end_date: self.end_date,
            is_completed: self.is_completed,
            is_active: true,
            count: 0,
            target: self.target,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One logged habit occurrence inside a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    pub period_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Descriptor for an entry a store should create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub period_id: String,
    pub timestamp: DateTime<Utc>,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn period(count: u32, target: Option<u32>) -> Period {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Period {
            id: "p1".into(),
            task_id: "t1".into(),
            unit: RecurrenceUnit::Day,
            start_date: t,
            end_date: None,
            is_completed: false,
            is_active: true,
            count,
            target,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn progress_is_zero_without_target() {
        assert_eq!(period(5, None).progress(), 0.0);
        assert_eq!(period(5, Some(0)).progress(), 0.0);
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        assert_eq!(period(1, Some(4)).progress(), 25.0);
        assert_eq!(period(8, Some(4)).progress(), 100.0);
    }

    #[test]
    fn target_reached_without_target_needs_one_entry() {
        assert!(!period(0, None).target_reached());
        assert!(period(1, None).target_reached());
        assert!(!period(2, Some(3)).target_reached());
        assert!(period(3, Some(3)).target_reached());
    }
}
