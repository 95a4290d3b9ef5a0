//! Period state transitions.
//!
//! The manager decides when a period must be closed and computes the
//! windows that follow it. It never persists anything itself: it mutates
//! values handed to it or returns descriptors for a store to create.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::calculator::{next_period_start, window_end, window_start_at};
use super::{NewPeriod, Period};
use crate::storage::WindowConfig;
use crate::task::RecurringTask;

/// The period that a completion closed out.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletedPeriod {
    /// The task's active period, now marked completed.
    Existing(Period),
    /// No period was active; this one is synthesized at `now` and must be created.
    Synthesized(NewPeriod),
}

impl CompletedPeriod {
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        match self {
            CompletedPeriod::Existing(p) => p.end_date,
            CompletedPeriod::Synthesized(p) => p.end_date,
        }
    }
}

/// Result of completing a task's current window.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTransition {
    pub completed: CompletedPeriod,
    /// Descriptor of the window that follows the completed one.
    pub next: NewPeriod,
    /// When the task becomes available again.
    pub next_available_at: DateTime<Utc>,
}

/// Skipped windows kept when a task comes back after a long absence.
/// One empty window is already enough to break a streak.
pub const MAX_SKIPPED_WINDOWS: usize = 366;

/// Windows that follow an elapsed period.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollover {
    /// Whole windows that passed without any interaction, oldest first.
    /// Each carries its boundary as `end_date` and is stored closed.
    pub skipped: Vec<NewPeriod>,
    /// The window containing `now`, to be stored as the active period.
    pub next: NewPeriod,
}

/// Summary of a window boundary for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WindowBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Owns the open → completed → finalized transitions of periods.
#[derive(Debug, Clone, Default)]
pub struct PeriodLifecycleManager {
    windows: WindowConfig,
}

impl PeriodLifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_windows(windows: WindowConfig) -> Self {
        Self { windows }
    }

    /// True once more than one nominal window (1/7/30/365 days by default)
    /// has passed since the period started.
    pub fn should_finalize(&self, period: &Period, now: DateTime<Utc>) -> bool {
        self.should_finalize_for(period, 1, now)
    }

    /// Same rule as [`should_finalize`](Self::should_finalize), scaled by the
    /// task's frequency so an "every 3 days" window gets 3 nominal days.
    pub fn should_finalize_for(&self, period: &Period, frequency: u32, now: DateTime<Utc>) -> bool {
        let factor = i32::try_from(frequency.max(1)).unwrap_or(i32::MAX);
        match self.windows.nominal(period.unit).checked_mul(factor) {
            Some(nominal) => now - period.start_date > nominal,
            None => false,
        }
    }

    /// Instant the period stops governing its task: the stamped end date,
    /// or the calendar boundary after its start for an open period.
    pub fn window_close(&self, period: &Period, frequency: u32) -> DateTime<Utc> {
        period
            .end_date
            .unwrap_or_else(|| next_period_start(period.unit, frequency, period.start_date))
    }

    /// Whether the active period no longer governs the task at `now`.
    ///
    /// Rollover follows calendar boundaries, so an entry logged after
    /// midnight never lands in the previous day's window. The nominal
    /// durations of [`should_finalize`](Self::should_finalize) are a separate,
    /// coarser check.
    pub fn needs_rollover(&self, period: &Period, frequency: u32, now: DateTime<Utc>) -> bool {
        now >= self.window_close(period, frequency)
    }

    /// Close a period at `at`.
    pub fn finalize_period(&self, period: &mut Period, at: DateTime<Utc>) {
        tracing::debug!(period_id = %period.id, task_id = %period.task_id, %at, "finalizing period");
        period.is_active = false;
        period.is_completed = true;
        period.end_date = Some(at);
        period.updated_at = at;
    }

    /// Mark the task's current window completed and describe the next one.
    ///
    /// With an active period the boundary is computed from its start date,
    /// re-anchoring at `now` if that boundary has already passed. Without one
    /// the window containing `now` (aligned to the task's anchor) is
    /// synthesized, so a first-ever completion still yields a valid
    /// `next_available_at`. The completed period keeps `is_active = true`;
    /// its `end_date` is the boundary.
    pub fn complete_and_create_next(
        &self,
        task: &RecurringTask,
        active: Option<&Period>,
        now: DateTime<Utc>,
    ) -> PeriodTransition {
        let spec = task.recurrence;

        let (completed, boundary) = match active {
            Some(period) => {
                let mut boundary = next_period_start(period.unit, spec.frequency, period.start_date);
                if boundary <= now {
                    tracing::warn!(
                        period_id = %period.id,
                        task_id = %task.id,
                        "completing a stale period; re-anchoring at now"
                    );
                    boundary = next_period_start(period.unit, spec.frequency, now);
                }

                let mut period = period.clone();
                period.is_completed = true;
                period.end_date = Some(boundary);
                period.updated_at = now;
                (CompletedPeriod::Existing(period), boundary)
            }
            None => {
                let start = window_start_at(spec.unit, spec.frequency, task.anchor_date, now);
                let boundary = next_period_start(spec.unit, spec.frequency, start);
                let synthesized = NewPeriod {
                    task_id: task.id.clone(),
                    unit: spec.unit,
                    start_date: start,
                    end_date: Some(boundary),
                    is_completed: true,
                    target: task.kind.target(),
                };
                (CompletedPeriod::Synthesized(synthesized), boundary)
            }
        };

        let unit = match &completed {
            CompletedPeriod::Existing(p) => p.unit,
            CompletedPeriod::Synthesized(p) => p.unit,
        };
        let next = NewPeriod {
            task_id: task.id.clone(),
            unit,
            start_date: boundary,
            end_date: Some(window_end(unit, spec.frequency, boundary)),
            is_completed: false,
            target: task.kind.target(),
        };

        tracing::debug!(task_id = %task.id, next_available_at = %boundary, "period completed");

        PeriodTransition {
            completed,
            next,
            next_available_at: boundary,
        }
    }

    /// Windows that replace an elapsed `period` at `now`.
    ///
    /// Steps forward boundary by boundary from the period's close. Every
    /// whole window that ended before `now` is returned in `skipped` so the
    /// history records the missed windows; only the most recent
    /// [`MAX_SKIPPED_WINDOWS`] are kept.
    pub fn rollover(&self, task: &RecurringTask, period: &Period, now: DateTime<Utc>) -> Rollover {
        let frequency = task.recurrence.frequency;
        let unit = period.unit;

        let mut start = period
            .end_date
            .filter(|end| *end > period.start_date)
            .unwrap_or_else(|| next_period_start(unit, frequency, period.start_date))
            .min(now);

        let mut skipped = VecDeque::new();
        loop {
            let next = next_period_start(unit, frequency, start);
            if next > now || next == DateTime::<Utc>::MAX_UTC {
                break;
            }
            if skipped.len() == MAX_SKIPPED_WINDOWS {
                skipped.pop_front();
            }
            skipped.push_back(NewPeriod {
                task_id: task.id.clone(),
                unit,
                start_date: start,
                end_date: Some(next),
                is_completed: false,
                target: task.kind.target(),
            });
            start = next;
        }

        Rollover {
            skipped: skipped.into(),
            next: NewPeriod {
                task_id: task.id.clone(),
                unit,
                start_date: start,
                end_date: None,
                is_completed: false,
                target: task.kind.target(),
            },
        }
    }

    /// A fresh open window containing `now`, for tasks with no active period.
    pub fn open_at(&self, task: &RecurringTask, now: DateTime<Utc>) -> NewPeriod {
        let spec = task.recurrence;
        NewPeriod {
            task_id: task.id.clone(),
            unit: spec.unit,
            start_date: window_start_at(spec.unit, spec.frequency, task.anchor_date, now),
            end_date: None,
            is_completed: false,
            target: task.kind.target(),
        }
    }
}
