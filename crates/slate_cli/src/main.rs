//! Slate CLI
//!
//! Run a slate simulation from a JSON request file, print a probability
//! report, and export the prop bitmaps as a MessagePack+LZ4 cache for the
//! downstream store.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use slate_core::{run_slate_with_props, SlateConfig, SlateRecords, SlateRequest};

#[derive(Parser)]
#[command(name = "slate_cli")]
#[command(about = "Simulate a baseball slate and export prop probabilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a slate request and export the prop cache
    Run {
        /// Input slate request JSON file
        #[arg(long)]
        r#in: PathBuf,

        /// Output prop cache file (MsgPack+LZ4)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Override the request's simulation count
        #[arg(long)]
        sims: Option<usize>,

        /// Override the request's base seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of props to print, sorted by name
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Read a prop cache back and query it
    Inspect {
        /// Prop cache file
        #[arg(long)]
        cache: PathBuf,

        /// Expected SHA-256 checksum to verify against
        #[arg(long)]
        checksum: Option<String>,

        /// Only print props whose name contains this substring
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { r#in, out, metadata, sims, seed, top } => {
            let raw = fs::read_to_string(&r#in)
                .with_context(|| format!("Failed to read request file: {}", r#in.display()))?;
            let request: SlateRequest =
                serde_json::from_str(&raw).context("Failed to parse slate request")?;

            let num_sims = sims.unwrap_or(request.num_sims);
            let base_seed = seed.unwrap_or(request.seed);
            let records =
                SlateRecords { batters: request.batters, pitchers: request.pitchers };
            let games: Vec<(String, String)> =
                request.games.into_iter().map(|g| (g.away, g.home)).collect();

            println!("Simulating {} game(s) x {} run(s)...", games.len(), num_sims);
            let (results, store) = run_slate_with_props(
                &records,
                &games,
                &SlateConfig::new(num_sims, base_seed),
                None,
            )?;

            println!(
                "Done: {} batter rows, {} pitcher rows, {} failed run(s)",
                results.batters.len(),
                results.pitchers.len(),
                results.failed_count()
            );

            for name in store.names().into_iter().take(top) {
                println!("  {:>7.4}  {}", store.probability(name)?, name);
            }
            if store.len() > top {
                println!("  ... {} more prop(s)", store.len() - top);
            }

            if let Some(out) = out {
                let meta = slate_cli::write_prop_cache(&store, &out)?;
                println!("Cache written: {} ({} bytes)", out.display(), meta.compressed_size);
                println!("  checksum: {}", meta.checksum);
                if let Some(metadata_path) = metadata {
                    slate_cli::save_metadata(&metadata_path, &meta)?;
                    println!("  metadata: {}", metadata_path.display());
                }
            }
        }

        Commands::Inspect { cache, checksum, filter } => {
            if let Some(expected) = checksum {
                if slate_cli::verify_cache(&cache, &expected)? {
                    println!("Checksum OK");
                } else {
                    anyhow::bail!("checksum mismatch for {}", cache.display());
                }
            }

            let store = slate_cli::read_prop_cache(&cache)?;
            println!("{} prop(s) over {} run(s)", store.len(), store.num_sims());
            for name in store.names() {
                if filter.as_deref().is_some_and(|f| !name.contains(f)) {
                    continue;
                }
                println!("  {:>7.4}  {}", store.probability(name)?, name);
            }
        }
    }

    Ok(())
}
