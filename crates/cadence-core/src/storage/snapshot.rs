//! JSON snapshot of tasks, periods and entries.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::MemoryStore;
use crate::error::Result;
use crate::period::{Entry, Period};
use crate::task::RecurringTask;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<RecurringTask>,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Snapshot {
    /// Read a snapshot file. A missing file yields an empty snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn into_store(self) -> MemoryStore {
        MemoryStore::from_parts(self.tasks, self.periods, self.entries)
    }
}

impl From<MemoryStore> for Snapshot {
    fn from(store: MemoryStore) -> Self {
        let (tasks, periods, entries) = store.into_parts();
        Self {
            tasks,
            periods,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::RecurrenceSpec;
    use crate::storage::TaskStore;
    use chrono::{TimeZone, Utc};

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::load(&dir.path().join("absent.json")).unwrap();
        assert!(snapshot.tasks.is_empty());
    }

    #[test]
    fn store_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut store = MemoryStore::new();
        store
            .insert_task(RecurringTask::new("u1", "Journal", RecurrenceSpec::daily(), now))
            .unwrap();
        Snapshot::from(store).save(&path).unwrap();

        let store = Snapshot::load(&path).unwrap().into_store();
        let tasks = store.list_by_owner("u1").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Journal");
    }
}
