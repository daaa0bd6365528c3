//! Schema version change command.

use super::{load_config, save_config};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use navcache_storage::StorageEngine;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct MigrateArgs {
    /// Directory holding the store
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// New schema version
    #[arg(short = 'v', long = "schema-version")]
    version: u32,
}

pub fn run(args: MigrateArgs) -> Result<()> {
    match migrate_store(&args.data_dir, args.version)? {
        None => println!(
            "  Already at schema v{}, nothing to do",
            args.version.to_string().bright_cyan()
        ),
        Some(previous) => println!(
            "{}  Schema v{} -> v{}, all cached data dropped",
            "✓".green().bold(),
            previous,
            args.version.to_string().bright_cyan()
        ),
    }
    Ok(())
}

/// Reopen the store at `version` and record it in config.json.
///
/// Returns the previous version, or `None` when it already matched.
fn migrate_store(data_dir: &Path, version: u32) -> Result<Option<u32>> {
    let config = load_config(data_dir)?;
    let previous = config.version;
    if previous == version {
        return Ok(None);
    }

    let config = config.with_version(version);
    let engine = StorageEngine::new(config.clone());

    // The reset happens on open; flush fails if the store could not be opened.
    if !engine.flush() || engine.stats().version != version {
        bail!("Failed to reopen storage with schema v{}", version);
    }
    engine.invalidate();
    tracing::info!(from = previous, to = version, "schema version changed");

    save_config(data_dir, &config)?;
    Ok(Some(previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use navcache_storage::StorageConfig;

    #[test]
    fn test_migrate_resets_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path().join("db"), 1);
        save_config(dir.path(), &config).unwrap();

        let engine = StorageEngine::new(config);
        assert!(engine.save_data("route:last", Some(&[1, 2, 3, 4][..])));
        drop(engine);

        assert_eq!(migrate_store(dir.path(), 2).unwrap(), Some(1));
        assert_eq!(load_config(dir.path()).unwrap().version, 2);

        let engine = StorageEngine::new(load_config(dir.path()).unwrap());
        assert!(!engine.has_data("route:last", false));
        drop(engine);

        assert_eq!(migrate_store(dir.path(), 2).unwrap(), None);
    }

    #[test]
    fn test_migrate_to_zero_on_unopenable_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        // The database path lies under a regular file, so it never opens.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let config = StorageConfig::new(blocker.join("db"), 1);
        save_config(dir.path(), &config).unwrap();

        assert!(migrate_store(dir.path(), 0).is_err());
        assert_eq!(load_config(dir.path()).unwrap(), config);
    }
}
