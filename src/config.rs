use crate::error::PipelineError;
use std::ops::Range;
use std::path::{Path, PathBuf};

// API configuration
pub const API_BASE_URL: &str = "https://api.collegefootballdata.com";
pub const SEASON_TYPE: &str = "regular";
pub const EXCLUDE_GARBAGE_TIME: bool = true;

// Weeks whose games get scored. The end is exclusive.
pub const FIRST_SCORED_WEEK: u8 = 2;
pub const SCORED_WEEKS_END: u8 = 16;

// Stats window
pub const STATS_START_WEEK: u8 = 1;
/// Week-1 games have no current-season history, so they use the previous
/// season through this week instead.
pub const PRIOR_SEASON_END_WEEK: u8 = 16;

// File names
pub const SEASON_FILE_PREFIX: &str = "cfp_data_";
pub const FALLBACK_FILE: &str = "games_data.csv";
pub const DEBUG_FILE: &str = "debug.txt";
pub const ALL_DATA_FILE: &str = "all_data.csv";

/// Seasons merged by the concat tool when none are given.
pub const DEFAULT_CONCAT_YEARS: Range<i32> = 2016..2025;

/// Runtime settings for one scraping run
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub weeks: Range<u8>,
    pub exclude_garbage_time: bool,
}

impl Settings {
    /// Build settings from the environment (and `.env` if present).
    /// `CFBD_API_KEY` is required; `CFBD_BASE_URL` optionally overrides the API host.
    pub fn from_env(output_dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        dotenv::dotenv().ok();
        Self::from_lookup(output_dir, |name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(output_dir: impl Into<PathBuf>, lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("CFBD_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(PipelineError::MissingApiKey)?;
        let base_url = lookup("CFBD_BASE_URL").unwrap_or_else(|| API_BASE_URL.to_string());

        Ok(Self::new(api_key, base_url, output_dir))
    }

    pub fn new(api_key: String, base_url: String, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key,
            base_url,
            output_dir: output_dir.into(),
            weeks: FIRST_SCORED_WEEK..SCORED_WEEKS_END,
            exclude_garbage_time: EXCLUDE_GARBAGE_TIME,
        }
    }

    pub fn season_output_path(&self, year: i32) -> PathBuf {
        season_file(&self.output_dir, year)
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.output_dir.join(FALLBACK_FILE)
    }

    pub fn debug_path(&self) -> PathBuf {
        self.output_dir.join(DEBUG_FILE)
    }
}

/// `cfp_data_<year>` under `dir`
pub fn season_file(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("{}{}", SEASON_FILE_PREFIX, year))
}
