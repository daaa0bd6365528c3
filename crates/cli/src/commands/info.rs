//! Store statistics command.

use super::open_engine;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// Directory holding the store
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let engine = open_engine(&args.data_dir)?;
    let stats = engine.stats();

    println!();
    println!("{}", "Store Information:".bold().cyan());
    println!();
    println!(
        "  Path:            {}",
        engine.config().path.display().to_string().bright_black()
    );
    println!(
        "  Schema version:  {}",
        stats.version.to_string().bright_cyan()
    );
    println!(
        "  Cache entries:   {}",
        stats.cache_entries.to_string().bright_cyan()
    );
    println!("  Chunks:          {}", stats.chunks.to_string().bright_cyan());
    println!();

    engine.invalidate();
    Ok(())
}
