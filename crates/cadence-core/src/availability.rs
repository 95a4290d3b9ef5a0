//! Availability resolver.
//!
//! Partitions a user's recurring tasks into buckets using each task's
//! active period (or its absence):
//!
//! | active period                              | bucket          |
//! |--------------------------------------------|-----------------|
//! | none                                       | available       |
//! | open (not completed)                       | available       |
//! | completed, started today                   | completed today |
//! | completed, not today, window elapsed       | available       |
//! | completed, not today, window still running | dormant         |
//!
//! Dormant tasks appear in neither primary list unless
//! `surface_dormant_as_completed` is set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::period::calculator::{is_same_day, next_period_start};
use crate::period::Period;
use crate::storage::AvailabilityConfig;
use crate::task::RecurringTask;

/// Why a task is available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AvailableReason {
    /// Never evaluated; a period is created on first completion.
    NoActivePeriod,
    /// Inside an open window, not yet done.
    OpenPeriod,
    /// The completed window has fully elapsed.
    WindowElapsed,
}

/// Bucket a single task falls into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    Available { reason: AvailableReason },
    CompletedToday { next_available_at: DateTime<Utc> },
    Dormant { until: DateTime<Utc> },
}

/// A completed-today task with the instant it comes back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedTask {
    #[serde(flatten)]
    pub task: RecurringTask,
    pub next_available_at: DateTime<Utc>,
}

/// A task hidden from both lists until its window elapses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DormantTask {
    pub task_id: String,
    pub until: DateTime<Utc>,
}

/// Resolver output for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityReport {
    pub available: Vec<RecurringTask>,
    pub completed_today: Vec<CompletedTask>,
    pub dormant: Vec<DormantTask>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityResolver {
    config: AvailabilityConfig,
}

impl AvailabilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AvailabilityConfig) -> Self {
        Self { config }
    }

    /// Classify one task given its active period.
    pub fn classify(
        &self,
        task: &RecurringTask,
        active: Option<&Period>,
        now: DateTime<Utc>,
    ) -> Availability {
        let Some(period) = active else {
            return Availability::Available {
                reason: AvailableReason::NoActivePeriod,
            };
        };

        if !period.is_completed {
            return Availability::Available {
                reason: AvailableReason::OpenPeriod,
            };
        }

        if is_same_day(period.start_date, now) {
            return Availability::CompletedToday {
                next_available_at: self.next_available_at(task, period, now),
            };
        }

        // An unstamped completed period ends at its computed boundary.
        let end = period.end_date.unwrap_or_else(|| {
            next_period_start(period.unit, task.recurrence.frequency, period.start_date)
        });

        if now >= end {
            Availability::Available {
                reason: AvailableReason::WindowElapsed,
            }
        } else if self.config.surface_dormant_as_completed {
            Availability::CompletedToday {
                next_available_at: end,
            }
        } else {
            Availability::Dormant { until: end }
        }
    }

    /// When a completed-today task becomes available again.
    ///
    /// A stamped boundary still ahead of `now` is used as is; otherwise the
    /// next boundary after the stamp (or after `now`) is computed.
    pub fn next_available_at(
        &self,
        task: &RecurringTask,
        period: &Period,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        match period.end_date {
            Some(end) if end > now => end,
            other => next_period_start(
                period.unit,
                task.recurrence.frequency,
                other.unwrap_or(now),
            ),
        }
    }

    /// Partition tasks into buckets. Input order is preserved within each bucket.
    pub fn resolve<'a, I>(&self, tasks: I, now: DateTime<Utc>) -> AvailabilityReport
    where
        I: IntoIterator<Item = (&'a RecurringTask, Option<&'a Period>)>,
    {
        let mut report = AvailabilityReport::default();

        for (task, active) in tasks {
            report.total_count += 1;
            let availability = self.classify(task, active, now);
            tracing::trace!(task_id = %task.id, ?availability, "classified task");

            match availability {
                Availability::Available { .. } => report.available.push(task.clone()),
                Availability::CompletedToday { next_available_at } => {
                    report.completed_today.push(CompletedTask {
                        task: task.clone(),
                        next_available_at,
                    })
                }
                Availability::Dormant { until } => report.dormant.push(DormantTask {
                    task_id: task.id.clone(),
                    until,
                }),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{RecurrenceSpec, RecurrenceUnit};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn task(id: &str, unit: RecurrenceUnit, frequency: u32) -> RecurringTask {
        RecurringTask::new(
            "u1",
            id,
            RecurrenceSpec::new(unit, frequency).unwrap(),
            at(2024, 1, 1, 0),
        )
        .with_id(id)
    }

    fn completed(task_id: &str, unit: RecurrenceUnit, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Period {
        Period {
            id: format!("{task_id}-p"),
            task_id: task_id.into(),
            unit,
            start_date: start,
            end_date: end,
            is_completed: true,
            is_active: true,
            count: 0,
            target: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn no_period_is_available() {
        let resolver = AvailabilityResolver::new();
        let t = task("a", RecurrenceUnit::Day, 1);
        assert_eq!(
            resolver.classify(&t, None, at(2024, 1, 1, 9)),
            Availability::Available {
                reason: AvailableReason::NoActivePeriod
            }
        );
    }

    #[test]
    fn open_period_is_available() {
        let resolver = AvailabilityResolver::new();
        let t = task("a", RecurrenceUnit::Day, 1);
        let mut p = completed("a", RecurrenceUnit::Day, at(2024, 1, 1, 0), None);
        p.is_completed = false;
        assert_eq!(
            resolver.classify(&t, Some(&p), at(2024, 1, 1, 9)),
            Availability::Available {
                reason: AvailableReason::OpenPeriod
            }
        );
    }

    #[test]
    fn completed_today_carries_boundary() {
        let resolver = AvailabilityResolver::new();
        let t = task("a", RecurrenceUnit::Day, 1);
        let p = completed("a", RecurrenceUnit::Day, at(2024, 1, 1, 8), Some(at(2024, 1, 2, 0)));
        assert_eq!(
            resolver.classify(&t, Some(&p), at(2024, 1, 1, 20)),
            Availability::CompletedToday {
                next_available_at: at(2024, 1, 2, 0)
            }
        );
    }

    #[test]
    fn completed_today_without_stamp_computes_from_now() {
        let resolver = AvailabilityResolver::new();
        let t = task("a", RecurrenceUnit::Day, 1);
        let p = completed("a", RecurrenceUnit::Day, at(2024, 1, 1, 8), None);
        assert_eq!(
            resolver.classify(&t, Some(&p), at(2024, 1, 1, 20)),
            Availability::CompletedToday {
                next_available_at: at(2024, 1, 2, 0)
            }
        );
    }

    #[test]
    fn elapsed_window_is_available_again() {
        let resolver = AvailabilityResolver::new();
        let t = task("a", RecurrenceUnit::Day, 1);
        let p = completed("a", RecurrenceUnit::Day, at(2024, 1, 1, 8), Some(at(2024, 1, 2, 0)));
        assert_eq!(
            resolver.classify(&t, Some(&p), at(2024, 1, 2, 0)),
            Availability::Available {
                reason: AvailableReason::WindowElapsed
            }
        );
    }

    #[test]
    fn mid_window_completion_is_dormant() {
        let resolver = AvailabilityResolver::new();
        let t = task("a", RecurrenceUnit::Day, 3);
        let p = completed("a", RecurrenceUnit::Day, at(2024, 1, 1, 8), Some(at(2024, 1, 4, 0)));
        assert_eq!(
            resolver.classify(&t, Some(&p), at(2024, 1, 2, 9)),
            Availability::Dormant {
                until: at(2024, 1, 4, 0)
            }
        );
    }

    #[test]
    fn dormant_can_be_surfaced_as_completed() {
        let resolver = AvailabilityResolver::with_config(AvailabilityConfig {
            surface_dormant_as_completed: true,
        });
        let t = task("a", RecurrenceUnit::Day, 3);
        let p = completed("a", RecurrenceUnit::Day, at(2024, 1, 1, 8), Some(at(2024, 1, 4, 0)));
        assert_eq!(
            resolver.classify(&t, Some(&p), at(2024, 1, 2, 9)),
            Availability::CompletedToday {
                next_available_at: at(2024, 1, 4, 0)
            }
        );
    }

    #[test]
    fn resolve_partitions_and_counts() {
        let resolver = AvailabilityResolver::new();
        let now = at(2024, 1, 2, 9);

        let fresh = task("fresh", RecurrenceUnit::Day, 1);
        let done = task("done", RecurrenceUnit::Day, 1);
        let sleeping = task("sleeping", RecurrenceUnit::Week, 1);
        let done_p = completed("done", RecurrenceUnit::Day, at(2024, 1, 2, 7), Some(at(2024, 1, 3, 0)));
        let sleeping_p = completed(
            "sleeping",
            RecurrenceUnit::Week,
            at(2024, 1, 1, 0),
            Some(at(2024, 1, 8, 0)),
        );

        let report = resolver.resolve(
            [
                (&fresh, None),
                (&done, Some(&done_p)),
                (&sleeping, Some(&sleeping_p)),
            ],
            now,
        );

        assert_eq!(report.total_count, 3);
        assert_eq!(report.available.len(), 1);
        assert_eq!(report.available[0].id, "fresh");
        assert_eq!(report.completed_today.len(), 1);
        assert_eq!(report.completed_today[0].next_available_at, at(2024, 1, 3, 0));
        assert_eq!(report.dormant.len(), 1);
        assert_eq!(report.dormant[0].task_id, "sleeping");
    }

    #[test]
    fn completed_task_serializes_flat() {
        let t = task("a", RecurrenceUnit::Day, 1);
        let json = serde_json::to_value(CompletedTask {
            task: t,
            next_available_at: at(2024, 1, 2, 0),
        })
        .unwrap();
        assert_eq!(json["id"], "a");
        assert!(json.get("next_available_at").is_some());
    }
}
