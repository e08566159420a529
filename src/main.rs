use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Join college football game results with each team's season-to-date
/// advanced stats, one CSV per season.
#[derive(Debug, Parser)]
#[command(name = "cfb_season_stats", version)]
struct Args {
    /// Seasons to scrape, e.g. 2019 2020 2021
    #[arg(required = true)]
    years: Vec<i32>,

    /// Directory the CSV files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    println!("Seasons: {:?}\n", args.years);

    let games = cfb_season_stats::scrape_seasons(&args.years, args.output_dir).await?;

    println!("\nSaved {} games across {} season(s)", games, args.years.len());
    Ok(())
}
