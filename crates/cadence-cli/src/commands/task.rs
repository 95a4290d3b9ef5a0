//! Task management commands for CLI.

use cadence_core::{RecurrenceSpec, RecurringTask, TaskStore};
use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::common::{print_json, resolve_now, CliResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a recurring task
    Add {
        /// Task title
        title: String,
        /// Owner ID
        #[arg(long, default_value = "me")]
        owner: String,
        /// Recurrence, e.g. "daily", "3d", "every 2 weeks"
        #[arg(long, default_value = "daily")]
        every: RecurrenceSpec,
        /// Track as a habit with entries
        #[arg(long)]
        habit: bool,
        /// Entries per period for a habit
        #[arg(long, requires = "habit")]
        target: Option<u32>,
        /// Explicit task ID (default: random UUID)
        #[arg(long)]
        id: Option<String>,
        /// Anchor timestamp (RFC 3339, default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// List tasks of an owner
    List {
        /// Owner ID
        #[arg(long, default_value = "me")]
        owner: String,
    },
    /// Remove a task with its periods and entries
    Remove {
        /// Task ID
        id: String,
    },
}

pub fn run(ctx: &Context, action: TaskAction) -> CliResult {
    match action {
        TaskAction::Add {
            title,
            owner,
            every,
            habit,
            target,
            id,
            now,
        } => {
            let mut task = RecurringTask::new(owner, title, every, resolve_now(now));
            if habit {
                task = task.with_habit_target(target);
            }
            if let Some(id) = id {
                task = task.with_id(id);
            }

            let mut engine = ctx.engine()?;
            let task = engine.add_task(task)?;
            ctx.persist(engine)?;
            eprintln!("Task created: {} ({})", task.title, task.recurrence);
            print_json(&task)?;
        }
        TaskAction::List { owner } => {
            let engine = ctx.engine()?;
            let tasks = engine.store().list_by_owner(&owner)?;
            print_json(&tasks)?;
        }
        TaskAction::Remove { id } => {
            let mut engine = ctx.engine()?;
            engine.delete_task(&id)?;
            ctx.persist(engine)?;
            eprintln!("Task removed: {id}");
        }
    }
    Ok(())
}
