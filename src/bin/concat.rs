use anyhow::{Context, Result};
use cfb_season_stats::config::{season_file, ALL_DATA_FILE, DEFAULT_CONCAT_YEARS};
use cfb_season_stats::data::concat_season_files;
use clap::Parser;
use std::path::PathBuf;

/// Merge per-season `cfp_data_<year>` files into a single CSV
#[derive(Debug, Parser)]
#[command(name = "concat", version)]
struct Args {
    /// Seasons to merge (defaults to 2016 through 2024)
    years: Vec<i32>,

    /// Directory holding the season files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Merged file name, relative to the output directory
    #[arg(long, default_value = ALL_DATA_FILE)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let years: Vec<i32> = if args.years.is_empty() {
        DEFAULT_CONCAT_YEARS.collect()
    } else {
        args.years
    };

    let inputs: Vec<PathBuf> = years
        .iter()
        .map(|&year| season_file(&args.output_dir, year))
        .collect();
    let output = args.output_dir.join(&args.output);

    let rows = concat_season_files(&inputs, &output)
        .with_context(|| format!("Failed to build {}", output.display()))?;

    tracing::info!(rows, files = inputs.len(), path = %output.display(), "merged seasons");
    println!("Wrote {} rows to {}", rows, output.display());
    Ok(())
}
