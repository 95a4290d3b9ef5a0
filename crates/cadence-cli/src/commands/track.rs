//! Completion, availability and streak commands.

use cadence_core::period::lifecycle::WindowBounds;
use cadence_core::period::window_end;
use cadence_core::{next_period_start, RecurrenceUnit};
use chrono::{DateTime, Utc};
use clap::Args;

use crate::common::{print_json, resolve_now, CliResult, Context};

#[derive(Args)]
pub struct AvailableArgs {
    /// Owner ID
    #[arg(long, default_value = "me")]
    owner: String,
    /// Evaluation time (RFC 3339, default: now)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// Task ID
    task_id: String,
    /// Completion time (RFC 3339, default: now)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Habit task ID
    task_id: String,
    /// Optional note
    #[arg(long)]
    note: Option<String>,
    /// Entry time (RFC 3339, default: now)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct StreakArgs {
    /// Task ID
    task_id: String,
    /// Evaluation time (RFC 3339, default: now)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct NextStartArgs {
    /// day, week, month or year
    #[arg(long)]
    unit: RecurrenceUnit,
    /// Every N units
    #[arg(long, default_value = "1")]
    frequency: u32,
    /// Reference time (RFC 3339, default: now)
    #[arg(long)]
    from: Option<DateTime<Utc>>,
}

pub fn available(ctx: &Context, args: AvailableArgs) -> CliResult {
    let engine = ctx.engine()?;
    let report = engine.get_available_tasks(&args.owner, resolve_now(args.now))?;
    print_json(&report)
}

pub fn complete(ctx: &Context, args: CompleteArgs) -> CliResult {
    let mut engine = ctx.engine()?;
    let outcome = engine.complete_task(&args.task_id, resolve_now(args.now))?;
    ctx.persist(engine)?;
    print_json(&outcome)
}

pub fn log(ctx: &Context, args: LogArgs) -> CliResult {
    let mut engine = ctx.engine()?;
    let outcome = engine.record_entry(&args.task_id, resolve_now(args.now), args.note)?;
    ctx.persist(engine)?;
    print_json(&outcome)
}

pub fn streak(ctx: &Context, args: StreakArgs) -> CliResult {
    let engine = ctx.engine()?;
    let info = engine.calculate_streak(&args.task_id, resolve_now(args.now))?;
    print_json(&info)
}

pub fn next_start(args: NextStartArgs) -> CliResult {
    if args.frequency == 0 {
        return Err("frequency must be at least 1".into());
    }
    let start = next_period_start(args.unit, args.frequency, resolve_now(args.from));
    let bounds = WindowBounds {
        start,
        end: window_end(args.unit, args.frequency, start),
    };
    print_json(&bounds)
}
