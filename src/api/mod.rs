pub mod cfbd_api;

use crate::error::ApiError;
use crate::models::GameInfo;
use cfbd_api::AdvancedSeasonStats;
use serde::Serialize;

/// Filters for `/games`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameQuery {
    pub year: i32,
    pub week: u8,
    pub team: String,
    pub season_type: String,
}

/// Filters for `/stats/season/advanced`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub year: i32,
    pub team: String,
    pub exclude_garbage_time: bool,
    pub start_week: u8,
    pub end_week: u8,
}

/// The slice of the College Football Data API the pipeline reads from.
///
/// An empty response is `Ok(None)` (or an empty list); every transport or
/// status failure is an `Err`.
#[allow(async_fn_in_trait)]
pub trait StatsSource {
    /// School names of the FBS teams for a season
    async fn fbs_teams(&self, year: i32) -> Result<Vec<String>, ApiError>;

    /// First game matching the query, if any
    async fn game(&self, query: &GameQuery) -> Result<Option<GameInfo>, ApiError>;

    /// First advanced season stats record matching the query, if any
    async fn advanced_season_stats(
        &self,
        query: &StatsQuery,
    ) -> Result<Option<AdvancedSeasonStats>, ApiError>;
}
