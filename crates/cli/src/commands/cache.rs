//! Cache region commands.

use super::{format_value, open_engine, parse_value};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct CacheArgs {
    /// Directory holding the store
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: CacheCommand,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Check whether a key has an entry
    Has {
        key: String,
    },
    /// Print the value stored under a key
    Get {
        key: String,
    },
    /// Insert or replace a value
    Put {
        key: String,

        /// Value as hex bytes, or `null` for an absent value
        value: String,
    },
}

pub fn run(args: CacheArgs) -> Result<()> {
    let engine = open_engine(&args.data_dir)?;

    match args.command {
        CacheCommand::Has { key } => {
            let present = engine.has_data(&key, false);
            println!(
                "  {}: {}",
                key.bright_yellow(),
                if present { "present".green() } else { "missing".bright_black() }
            );
        }
        CacheCommand::Get { key } => {
            // Check presence first so a stored null is distinguishable from a miss.
            if !engine.has_data(&key, false) {
                println!("  {}: {}", key.bright_yellow(), "missing".bright_black());
                return Ok(());
            }
            let value = engine.get_data(&key, None);
            println!(
                "  {}: {}",
                key.bright_yellow(),
                format_value(value.as_deref()).bright_cyan()
            );
        }
        CacheCommand::Put { key, value } => {
            let value = parse_value(&value)?;
            if !engine.save_data(&key, value.as_deref()) {
                bail!("Failed to save {}", key);
            }
            println!(
                "{}  Saved {} = {}",
                "✓".green().bold(),
                key.bright_yellow(),
                format_value(value.as_deref()).bright_black()
            );
        }
    }

    engine.invalidate();
    Ok(())
}
