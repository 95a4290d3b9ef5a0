//! Engine facade over the stores.
//!
//! Every operation takes `now` explicitly; nothing here reads the clock, so
//! identical store contents and inputs always produce identical results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityReport, AvailabilityResolver};
use crate::error::{CoreError, Result, ValidationError};
use crate::period::{CompletedPeriod, Entry, NewEntry, NewPeriod, Period, PeriodLifecycleManager};
use crate::storage::{Config, EntryStore, PeriodStore, TaskStore};
use crate::streak::{StreakCalculator, StreakInfo};
use crate::task::RecurringTask;

/// Result of marking a recurring task done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionOutcome {
    pub task: RecurringTask,
    /// The period that was completed, as stored.
    pub period: Period,
    pub next_available_at: DateTime<Utc>,
    /// The window that follows; created once the current one elapses.
    pub upcoming: NewPeriod,
}

/// Result of logging a habit entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryOutcome {
    pub entry: Entry,
    pub period: Period,
    pub progress: f64,
    /// Set when this entry completed the period.
    pub next_available_at: Option<DateTime<Utc>>,
}

pub struct RecurringEngine<S> {
    store: S,
    lifecycle: PeriodLifecycleManager,
    resolver: AvailabilityResolver,
    streaks: StreakCalculator,
}

impl<S> RecurringEngine<S>
where
    S: TaskStore + PeriodStore + EntryStore,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            store,
            lifecycle: PeriodLifecycleManager::with_windows(config.windows.clone()),
            resolver: AvailabilityResolver::with_config(config.availability.clone()),
            streaks: StreakCalculator::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn add_task(&mut self, task: RecurringTask) -> Result<RecurringTask> {
        self.store.insert_task(task)
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<()> {
        self.store.delete_task(task_id)
    }

    /// Classify every task of `owner_id` at `now`. Read-only.
    pub fn get_available_tasks(&self, owner_id: &str, now: DateTime<Utc>) -> Result<AvailabilityReport> {
        let tasks = self.store.list_by_owner(owner_id)?;
        let mut with_periods = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let active = self.store.find_active_by_task_id(&task.id)?;
            with_periods.push((task, active));
        }

        let report = self
            .resolver
            .resolve(with_periods.iter().map(|(t, p)| (*t, p.as_ref())), now);
        tracing::debug!(
            owner_id,
            available = report.available.len(),
            completed_today = report.completed_today.len(),
            dormant = report.dormant.len(),
            "resolved availability"
        );
        Ok(report)
    }

    /// Mark a task done for its current window.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the task does not exist.
    pub fn complete_task(&mut self, task_id: &str, now: DateTime<Utc>) -> Result<CompletionOutcome> {
        let task = self.require_task(task_id)?;
        let active = self.current_period(&task, now)?;

        if active.as_ref().is_some_and(|p| p.is_completed) {
            tracing::debug!(task_id, "task already completed for this window");
        }

        let transition = self
            .lifecycle
            .complete_and_create_next(&task, active.as_ref(), now);
        let period = match transition.completed {
            CompletedPeriod::Existing(period) => self.store.update(period)?,
            CompletedPeriod::Synthesized(data) => PeriodStore::create(&mut self.store, data, now)?,
        };
        let task = self.store.mark_complete(task_id, now)?;

        tracing::info!(
            task_id,
            next_available_at = %transition.next_available_at,
            "completed recurring task"
        );

        Ok(CompletionOutcome {
            task,
            period,
            next_available_at: transition.next_available_at,
            upcoming: transition.next,
        })
    }

    /// Log one habit occurrence at `now`.
    ///
    /// The entry lands in the task's current window, which is created if
    /// missing or rolled over if elapsed. Reaching the period target
    /// completes the window.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown task and a validation
    /// error if the task is not a habit.
    pub fn record_entry(
        &mut self,
        task_id: &str,
        now: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<EntryOutcome> {
        let task = self.require_habit(task_id)?;

        let mut period = match self.current_period(&task, now)? {
            Some(period) => period,
            None => {
                let data = self.lifecycle.open_at(&task, now);
                PeriodStore::create(&mut self.store, data, now)?
            }
        };

        let entry = EntryStore::create(
            &mut self.store,
            NewEntry {
                period_id: period.id.clone(),
                timestamp: now,
                note,
            },
        )?;

        let was_completed = period.is_completed;
        period.count += 1;
        period.updated_at = now;
        let mut period = self.store.update(period)?;

        let mut next_available_at = None;
        if !was_completed && period.target_reached() {
            let transition = self
                .lifecycle
                .complete_and_create_next(&task, Some(&period), now);
            if let CompletedPeriod::Existing(completed) = transition.completed {
                period = self.store.update(completed)?;
            }
            self.store.mark_complete(task_id, now)?;
            next_available_at = Some(transition.next_available_at);
        }

        tracing::info!(
            task_id,
            count = period.count,
            target = ?period.target,
            "recorded habit entry"
        );

        Ok(EntryOutcome {
            entry,
            progress: period.progress(),
            period,
            next_available_at,
        })
    }

    /// Streak summary for one habit.
    ///
    /// Streaks count periods with logged entries, and only habits log
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the task does not exist and a
    /// validation error if it is not a habit.
    pub fn calculate_streak(&self, task_id: &str, now: DateTime<Utc>) -> Result<StreakInfo> {
        let task = self.require_habit(task_id)?;
        let periods = self.store.list_by_task_id(task_id)?;
        let entries = self.store.find_by_task_id(task_id)?;
        Ok(self.streaks.calculate(&task, &periods, &entries, now))
    }

    fn require_task(&self, task_id: &str) -> Result<RecurringTask> {
        self.store
            .get_task(task_id)?
            .ok_or_else(|| CoreError::task_not_found(task_id))
    }

    fn require_habit(&self, task_id: &str) -> Result<RecurringTask> {
        let task = self.require_task(task_id)?;
        if !task.kind.is_habit() {
            return Err(ValidationError::InvalidValue {
                field: "task_id".into(),
                message: format!("task {task_id} is not a habit"),
            }
            .into());
        }
        Ok(task)
    }

    /// The active period still governing `task` at `now`.
    ///
    /// An elapsed active period is finalized at its boundary. Windows that
    /// passed untouched are stored as closed periods without entries, so they
    /// break streaks, and the window containing `now` becomes active.
    fn current_period(&mut self, task: &RecurringTask, now: DateTime<Utc>) -> Result<Option<Period>> {
        let Some(active) = self.store.find_active_by_task_id(&task.id)? else {
            return Ok(None);
        };

        let frequency = task.recurrence.frequency;
        if !self.lifecycle.needs_rollover(&active, frequency, now) {
            return Ok(Some(active));
        }

        let close = self.lifecycle.window_close(&active, frequency).min(now);
        let closed = self.store.finalize(&active.id, close)?;
        let rollover = self.lifecycle.rollover(task, &closed, now);

        let skipped = rollover.skipped.len();
        for window in rollover.skipped {
            let end = window.end_date.unwrap_or(now);
            let created = PeriodStore::create(&mut self.store, window, now)?;
            self.store.finalize(&created.id, end)?;
        }

        tracing::debug!(
            task_id = %task.id,
            closed = %closed.id,
            skipped,
            start = %rollover.next.start_date,
            "rolled over elapsed period"
        );
        let created = PeriodStore::create(&mut self.store, rollover.next, now)?;
        Ok(Some(created))
    }
}
