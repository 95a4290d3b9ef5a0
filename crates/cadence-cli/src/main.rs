use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "cadence", version, about = "Recurring task and habit tracker")]
struct Cli {
    /// Snapshot file holding tasks, periods and entries
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Config file (defaults to ~/.config/cadence/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// List available, completed-today and dormant tasks
    Available(commands::track::AvailableArgs),
    /// Mark a recurring task done
    Complete(commands::track::CompleteArgs),
    /// Log a habit entry
    Log(commands::track::LogArgs),
    /// Show current and longest streak
    Streak(commands::track::StreakArgs),
    /// Compute the next period boundary
    NextStart(commands::track::NextStartArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cadence=info,cadence_core=info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = common::Context::new(cli.snapshot, cli.config);

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(&ctx, action),
        Commands::Available(args) => commands::track::available(&ctx, args),
        Commands::Complete(args) => commands::track::complete(&ctx, args),
        Commands::Log(args) => commands::track::log(&ctx, args),
        Commands::Streak(args) => commands::track::streak(&ctx, args),
        Commands::NextStart(args) => commands::track::next_start(args),
        Commands::Config { action } => commands::config::run(&ctx, action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cadence", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
