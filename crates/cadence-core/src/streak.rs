//! Streak calculation over a task's period history.
//!
//! A streak is the number of consecutive periods, most recent first, that
//! have at least one entry. Adjacency is taken from the sorted period list,
//! not verified against the calendar: a window for which no period record
//! exists is invisible here, it neither extends nor breaks a streak. The
//! engine stores every missed window as an empty period, so histories it
//! builds have no such holes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::period::calculator::is_same_day;
use crate::period::{Entry, Period};
use crate::task::RecurringTask;

/// Streak summary for one task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakInfo {
    /// Length of the most recent run of periods with activity.
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<DateTime<Utc>>,
    /// Any entry logged on today's calendar day, regardless of streak state.
    pub is_active_today: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StreakCalculator;

impl StreakCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute streaks for `task` from its periods and entries.
    ///
    /// Periods belonging to other tasks are ignored; entries are matched to
    /// periods by `period_id`, so entries of other tasks are ignored too.
    pub fn calculate(
        &self,
        task: &RecurringTask,
        periods: &[Period],
        entries: &[Entry],
        now: DateTime<Utc>,
    ) -> StreakInfo {
        let mut periods: Vec<&Period> = periods.iter().filter(|p| p.task_id == task.id).collect();
        periods.sort_by(|a, b| b.start_date.cmp(&a.start_date));

        let mut by_period: HashMap<&str, Vec<&Entry>> = periods
            .iter()
            .map(|p| (p.id.as_str(), Vec::new()))
            .collect();
        for entry in entries {
            if let Some(bucket) = by_period.get_mut(entry.period_id.as_str()) {
                bucket.push(entry);
            }
        }

        let mut current: Option<u32> = None;
        let mut longest = 0u32;
        let mut temp = 0u32;
        let mut last_completed: Option<DateTime<Utc>> = None;

        for period in &periods {
            match by_period.get(period.id.as_str()) {
                Some(period_entries) if !period_entries.is_empty() => {
                    temp += 1;
                    let latest = period_entries.iter().map(|e| e.timestamp).max();
                    last_completed = last_completed.max(latest);
                }
                _ => {
                    if current.is_none() {
                        current = Some(temp);
                    }
                    longest = longest.max(temp);
                    temp = 0;
                }
            }
        }

        let current_streak = current.unwrap_or(temp);
        let longest_streak = longest.max(temp);
        let is_active_today = by_period
            .values()
            .flatten()
            .any(|e| is_same_day(e.timestamp, now));

        tracing::debug!(
            task_id = %task.id,
            current_streak,
            longest_streak,
            "computed streak"
        );

        StreakInfo {
            current_streak,
            longest_streak,
            last_completed_date: last_completed,
            is_active_today,
        }
    }
}
