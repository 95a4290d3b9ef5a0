//! # Cadence Core Library
//!
//! Period and streak engine for recurring tasks and habits. Given a task's
//! repeating schedule it decides when the task next becomes available after
//! completion, which bucket it currently falls into, and how long its
//! current and longest streaks are.
//!
//! ## Architecture
//!
//! - **Period calculator**: pure boundary arithmetic per recurrence unit
//! - **Lifecycle manager**: open → completed → finalized transitions of a period
//! - **Availability resolver**: available / completed-today / dormant buckets
//! - **Streak calculator**: consecutive periods with activity
//! - **Storage**: store contracts, an in-memory store, JSON snapshots and
//!   TOML configuration
//!
//! Nothing in this crate reads the clock: every operation takes `now`.
//!
//! ## Key Components
//!
//! - [`RecurringEngine`]: facade exposing the operations over a store
//! - [`next_period_start`]: boundary calculation
//! - [`AvailabilityResolver`], [`StreakCalculator`], [`PeriodLifecycleManager`]

pub mod availability;
pub mod engine;
pub mod error;
pub mod period;
pub mod recurrence;
pub mod storage;
pub mod streak;
pub mod task;

pub use availability::{
    Availability, AvailabilityReport, AvailabilityResolver, AvailableReason, CompletedTask,
    DormantTask,
};
pub use engine::{CompletionOutcome, EntryOutcome, RecurringEngine};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use period::{
    next_period_start, Entry, NewEntry, NewPeriod, Period, PeriodLifecycleManager,
    PeriodTransition,
};
pub use recurrence::{RecurrenceSpec, RecurrenceUnit};
pub use storage::{Config, EntryStore, MemoryStore, PeriodStore, Snapshot, TaskStore};
pub use streak::{StreakCalculator, StreakInfo};
pub use task::{RecurringTask, TaskKind};
