//! Initialize store command.

use super::save_config;
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use navcache_storage::{StorageConfig, StorageEngine};
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to store cache data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Schema version
    #[arg(short = 'v', long = "schema-version", default_value = "1")]
    version: u32,
}

pub fn run(args: InitArgs) -> Result<()> {
    println!("{}", "Initializing navcache...".bold().cyan());
    println!();

    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", args.data_dir))?;
    println!("{}  Created data directory", "✓".green().bold());

    let config = StorageConfig::new(args.data_dir.join("db"), args.version);
    let engine = StorageEngine::new(config.clone());

    // Opening happens lazily; force it so a broken location fails here.
    if !engine.flush() {
        bail!("Failed to open storage at {}", config.path.display());
    }
    println!(
        "{}  Opened store at: {} (schema v{})",
        "✓".green().bold(),
        config.path.display().to_string().bright_black(),
        config.version.to_string().bright_cyan()
    );

    save_config(&args.data_dir, &config)?;
    println!(
        "{}  Saved config to: {}",
        "✓".green().bold(),
        args.data_dir
            .join(super::CONFIG_FILE)
            .display()
            .to_string()
            .bright_black()
    );

    println!();
    println!("{}", "Store initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to store a value",
        "navcache cache put <key> <hex>".bright_cyan()
    );
    println!(
        "  • Use {} to checkpoint chunks",
        "navcache chunks put <hex>...".bright_cyan()
    );

    Ok(())
}
