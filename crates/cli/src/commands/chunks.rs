//! Chunk region commands.

use super::{format_value, open_engine, parse_value};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ChunksArgs {
    /// Directory holding the store
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: ChunksCommand,
}

#[derive(Subcommand)]
enum ChunksCommand {
    /// List the stored chunks in order
    Get {
        /// Write the concatenated chunks to this file instead of listing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the stored chunks
    Put {
        /// Chunks as hex bytes, or `null` for an absent chunk
        #[arg(required_unless_present = "file")]
        chunks: Vec<String>,

        /// Split this file into chunks instead
        #[arg(short, long, conflicts_with = "chunks")]
        file: Option<PathBuf>,

        /// Chunk size in bytes when splitting a file
        #[arg(long, default_value = "65536")]
        chunk_size: usize,
    },
}

pub fn run(args: ChunksArgs) -> Result<()> {
    let engine = open_engine(&args.data_dir)?;

    match args.command {
        ChunksCommand::Get { output } => {
            let chunks = engine.get_chunked_data();
            match output {
                Some(path) => {
                    let bytes: Vec<u8> = chunks.iter().flatten().flatten().copied().collect();
                    fs::write(&path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "{}  Wrote {} chunks ({} bytes) to {}",
                        "✓".green().bold(),
                        chunks.len(),
                        bytes.len(),
                        path.display().to_string().bright_black()
                    );
                }
                None if chunks.is_empty() => {
                    println!("  {}", "No chunks stored".bright_black());
                }
                None => {
                    for (index, chunk) in chunks.iter().enumerate() {
                        println!(
                            "  [{}] {}",
                            index.to_string().bright_yellow(),
                            format_value(chunk.as_deref()).bright_cyan()
                        );
                    }
                }
            }
        }
        ChunksCommand::Put {
            chunks,
            file,
            chunk_size,
        } => {
            let chunks = match file {
                Some(path) => split_file(&path, chunk_size)?,
                None => chunks
                    .iter()
                    .map(|chunk| parse_value(chunk))
                    .collect::<Result<Vec<_>>>()?,
            };
            if !engine.save_chunked_data(&chunks) {
                bail!("Failed to save chunks");
            }
            println!(
                "{}  Stored {} chunks",
                "✓".green().bold(),
                chunks.len().to_string().bright_cyan()
            );
        }
    }

    engine.invalidate();
    Ok(())
}

fn split_file(path: &Path, chunk_size: usize) -> Result<Vec<Option<Vec<u8>>>> {
    if chunk_size == 0 {
        bail!("Chunk size must be greater than zero");
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(bytes
        .chunks(chunk_size)
        .map(|chunk| Some(chunk.to_vec()))
        .collect())
}
