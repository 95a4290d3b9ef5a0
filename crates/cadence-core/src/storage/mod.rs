//! Store contracts and the in-memory implementation.
//!
//! The engine never talks to a database directly; it reads and writes
//! through [`TaskStore`], [`PeriodStore`] and [`EntryStore`]. A durable
//! backend must make "close the old active period, open the new one" atomic
//! (a transaction or a uniqueness constraint on `(task_id, is_active)`), since
//! two concurrent completions could otherwise both open a new active period.

mod config;
pub mod memory;
pub mod snapshot;

pub use config::{AvailabilityConfig, Config, WindowConfig};
pub use memory::MemoryStore;
pub use snapshot::Snapshot;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::error::Result;
use crate::period::{Entry, NewEntry, NewPeriod, Period};
use crate::task::RecurringTask;

/// Access to recurring tasks.
pub trait TaskStore {
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<RecurringTask>>;

    fn get_task(&self, task_id: &str) -> Result<Option<RecurringTask>>;

    fn insert_task(&mut self, task: RecurringTask) -> Result<RecurringTask>;

    /// Stamp the task's last-completed marker.
    fn mark_complete(&mut self, task_id: &str, at: DateTime<Utc>) -> Result<RecurringTask>;

    /// Remove a task together with its periods and entries.
    fn delete_task(&mut self, task_id: &str) -> Result<()>;
}

/// Access to period records.
pub trait PeriodStore {
    fn find_active_by_task_id(&self, task_id: &str) -> Result<Option<Period>>;

    fn list_by_task_id(&self, task_id: &str) -> Result<Vec<Period>>;

    /// Persist a new active period.
    ///
    /// Implementations must refuse to create a second active period for
    /// the same task.
    fn create(&mut self, data: NewPeriod, now: DateTime<Utc>) -> Result<Period>;

    fn update(&mut self, period: Period) -> Result<Period>;

    /// Close a period: inactive, completed, end date stamped.
    fn finalize(&mut self, period_id: &str, end_date: DateTime<Utc>) -> Result<Period>;
}

/// Access to habit entries.
pub trait EntryStore {
    fn find_by_task_id(&self, task_id: &str) -> Result<Vec<Entry>>;

    fn create(&mut self, data: NewEntry) -> Result<Entry>;
}

/// Returns `~/.config/cadence[-dev]/` based on CADENCE_ENV.
///
/// Set CADENCE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CADENCE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cadence-dev")
    } else {
        base_dir.join("cadence")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
