use clap::Subcommand;
use cadence_core::Config;

use crate::common::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "windows.month_days")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(ctx: &Context, action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = ctx.load_config()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = ctx.load_config()?;
            config.set(&key, &value)?;
            ctx.save_config(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            print_json(&ctx.load_config()?)?;
        }
        ConfigAction::Reset => {
            ctx.save_config(&Config::default())?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => match ctx.config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("{}", Config::path()?.display()),
        },
    }
    Ok(())
}
