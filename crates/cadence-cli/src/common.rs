//! Shared plumbing for CLI commands: snapshot and config locations, the
//! engine constructor and the clock.

use cadence_core::storage::data_dir;
use cadence_core::{Config, MemoryStore, RecurringEngine, Snapshot};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct Context {
    snapshot: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Context {
    pub fn new(snapshot: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self { snapshot, config }
    }

    pub fn snapshot_path(&self) -> CliResult<PathBuf> {
        match &self.snapshot {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("snapshot.json")),
        }
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    /// Load the config from `--config` or the default location.
    pub fn load_config(&self) -> CliResult<Config> {
        match &self.config {
            Some(path) if path.exists() => Ok(Config::load_from(path)?),
            Some(_) => Ok(Config::default()),
            None => Ok(Config::load()?),
        }
    }

    pub fn save_config(&self, config: &Config) -> CliResult {
        match &self.config {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        Ok(())
    }

    pub fn engine(&self) -> CliResult<RecurringEngine<MemoryStore>> {
        let config = self.load_config()?;
        let store = Snapshot::load(&self.snapshot_path()?)?.into_store();
        Ok(RecurringEngine::with_config(store, &config))
    }

    pub fn persist(&self, engine: RecurringEngine<MemoryStore>) -> CliResult {
        let path = self.snapshot_path()?;
        Snapshot::from(engine.into_store()).save(&path)?;
        tracing::debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }
}

/// `--now` if given, otherwise the wall clock, read once per invocation.
pub fn resolve_now(now: Option<DateTime<Utc>>) -> DateTime<Utc> {
    now.unwrap_or_else(Utc::now)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
