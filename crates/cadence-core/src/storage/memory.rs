//! In-memory store backing tests, the CLI snapshot and embedders that
//! already hold their data in memory.

use chrono::{DateTime, Utc};

use super::{EntryStore, PeriodStore, TaskStore};
use crate::error::{CoreError, Result};
use crate::period::{Entry, NewEntry, NewPeriod, Period};
use crate::task::RecurringTask;

/// Vec-backed store; lists come back in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: Vec<RecurringTask>,
    periods: Vec<Period>,
    entries: Vec<Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from pre-existing records without re-validating them.
    pub fn from_parts(tasks: Vec<RecurringTask>, periods: Vec<Period>, entries: Vec<Entry>) -> Self {
        Self {
            tasks,
            periods,
            entries,
        }
    }

    pub fn tasks(&self) -> &[RecurringTask] {
        &self.tasks
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_parts(self) -> (Vec<RecurringTask>, Vec<Period>, Vec<Entry>) {
        (self.tasks, self.periods, self.entries)
    }

    fn period_mut(&mut self, period_id: &str) -> Result<&mut Period> {
        self.periods
            .iter_mut()
            .find(|p| p.id == period_id)
            .ok_or_else(|| CoreError::period_not_found(period_id))
    }
}

impl TaskStore for MemoryStore {
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<RecurringTask>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn get_task(&self, task_id: &str) -> Result<Option<RecurringTask>> {
        Ok(self.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    fn insert_task(&mut self, task: RecurringTask) -> Result<RecurringTask> {
        task.recurrence.validate()?;
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => self.tasks.push(task.clone()),
        }
        Ok(task)
    }

    fn mark_complete(&mut self, task_id: &str, at: DateTime<Utc>) -> Result<RecurringTask> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| CoreError::task_not_found(task_id))?;
        task.last_completed_at = Some(at);
        Ok(task.clone())
    }

    fn delete_task(&mut self, task_id: &str) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() == before {
            return Err(CoreError::task_not_found(task_id));
        }

        let period_ids: Vec<String> = self
            .periods
            .iter()
            .filter(|p| p.task_id == task_id)
            .map(|p| p.id.clone())
            .collect();
        self.entries.retain(|e| !period_ids.contains(&e.period_id));
        self.periods.retain(|p| p.task_id != task_id);
        Ok(())
    }
}

impl PeriodStore for MemoryStore {
    fn find_active_by_task_id(&self, task_id: &str) -> Result<Option<Period>> {
        Ok(self
            .periods
            .iter()
            .find(|p| p.task_id == task_id && p.is_active)
            .cloned())
    }

    fn list_by_task_id(&self, task_id: &str) -> Result<Vec<Period>> {
        Ok(self
            .periods
            .iter()
            .filter(|p| p.task_id == task_id)
            .cloned()
            .collect())
    }

    fn create(&mut self, data: NewPeriod, now: DateTime<Utc>) -> Result<Period> {
        if self
            .periods
            .iter()
            .any(|p| p.task_id == data.task_id && p.is_active)
        {
            return Err(CoreError::ActivePeriodConflict {
                task_id: data.task_id,
            });
        }
        let period = data.into_period(uuid::Uuid::new_v4().to_string(), now);
        self.periods.push(period.clone());
        Ok(period)
    }

    fn update(&mut self, period: Period) -> Result<Period> {
        let slot = self.period_mut(&period.id)?;
        *slot = period.clone();
        Ok(period)
    }

    fn finalize(&mut self, period_id: &str, end_date: DateTime<Utc>) -> Result<Period> {
        let period = self.period_mut(period_id)?;
        period.is_active = false;
        period.is_completed = true;
        period.end_date = Some(end_date);
        period.updated_at = end_date;
        Ok(period.clone())
    }
}

impl EntryStore for MemoryStore {
    fn find_by_task_id(&self, task_id: &str) -> Result<Vec<Entry>> {
        let period_ids: Vec<&str> = self
            .periods
            .iter()
            .filter(|p| p.task_id == task_id)
            .map(|p| p.id.as_str())
            .collect();
        Ok(self
            .entries
            .iter()
            .filter(|e| period_ids.contains(&e.period_id.as_str()))
            .cloned()
            .collect())
    }

    fn create(&mut self, data: NewEntry) -> Result<Entry> {
        if !self.periods.iter().any(|p| p.id == data.period_id) {
            return Err(CoreError::period_not_found(data.period_id));
        }
        let entry = Entry {
            id: uuid::Uuid::new_v4().to_string(),
            period_id: data.period_id,
            timestamp: data.timestamp,
            note: data.note,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }
}
