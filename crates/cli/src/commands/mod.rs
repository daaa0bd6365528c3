//! CLI commands module.

use anyhow::{Context, Result};
use clap::Subcommand;
use navcache_storage::{StorageConfig, StorageEngine};
use std::fs;
use std::path::Path;

mod cache;
mod chunks;
mod info;
mod init;
mod migrate;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new store
    Init(init::InitArgs),
    /// Cache region operations
    Cache(cache::CacheArgs),
    /// Chunk region operations
    Chunks(chunks::ChunksArgs),
    /// Show store statistics
    Info(info::InfoArgs),
    /// Reopen the store with a new schema version (drops all data on change)
    Migrate(migrate::MigrateArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Cache(args) => cache::run(args),
        Commands::Chunks(args) => chunks::run(args),
        Commands::Info(args) => info::run(args),
        Commands::Migrate(args) => migrate::run(args),
    }
}

fn load_config(data_dir: &Path) -> Result<StorageConfig> {
    let config_file = data_dir.join(CONFIG_FILE);
    let content = fs::read_to_string(&config_file)
        .context("Failed to read config.json. Did you run 'navcache init'?")?;
    serde_json::from_str(&content).context("Failed to parse config.json")
}

fn save_config(data_dir: &Path, config: &StorageConfig) -> Result<()> {
    let config_file = data_dir.join(CONFIG_FILE);
    fs::write(&config_file, serde_json::to_string_pretty(config)?)
        .with_context(|| format!("Failed to write {}", config_file.display()))
}

fn open_engine(data_dir: &Path) -> Result<StorageEngine> {
    Ok(StorageEngine::new(load_config(data_dir)?))
}

/// Parse a chunk or value argument: hex bytes, or `null` for an absent value.
fn parse_value(input: &str) -> Result<Option<Vec<u8>>> {
    if input.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(digits).with_context(|| format!("Invalid hex value: {}", input))?;
    Ok(Some(bytes))
}

fn format_value(value: Option<&[u8]>) -> String {
    match value {
        Some(bytes) => format!("0x{} ({} bytes)", hex::encode(bytes), bytes.len()),
        None => "null".to_string(),
    }
}
