pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use api::*;
pub use models::*;
pub use utils::*;

use anyhow::{Context, Result};
use api::cfbd_api::CfbdApiClient;
use config::Settings;
use std::path::PathBuf;

/// Scrape every season in `years` from the College Football Data API,
/// writing `cfp_data_<year>` files under `output_dir`.
pub async fn scrape_seasons(years: &[i32], output_dir: PathBuf) -> Result<usize> {
    let settings = Settings::from_env(output_dir).context("Failed to load settings")?;

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    let client = CfbdApiClient::new(settings.api_key.clone(), settings.base_url.clone());

    let games = pipeline::run_seasons(&client, &settings, years)
        .await
        .context("Failed to scrape seasons")?;

    // Quota is informational only
    match client.check_usage().await {
        Ok(info) => println!("CFB Data API requests remaining: {}", info.remaining_calls),
        Err(e) => tracing::warn!(error = %e, "failed to check API usage"),
    }

    Ok(games)
}
