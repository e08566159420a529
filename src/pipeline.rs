//! Season scraping: list teams, walk every team's schedule, join each new
//! game with both teams' season-to-date stats, and write one CSV per season.

use crate::api::{GameQuery, StatsQuery, StatsSource};
use crate::config::{Settings, PRIOR_SEASON_END_WEEK, SEASON_TYPE, STATS_START_WEEK};
use crate::error::PipelineError;
use crate::models::{DebugRecord, GameInfo, GameRow, SeasonStats};
use crate::utils::data::save_rows;
use crate::utils::flatten::season_stats_from;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// A season that stopped early, with whatever rows it had collected
#[derive(Debug)]
pub struct SeasonFailure {
    pub rows: Vec<GameRow>,
    pub year: i32,
    pub team: Option<String>,
    pub week: Option<u8>,
    pub error: PipelineError,
}

impl SeasonFailure {
    fn debug_record(&self) -> DebugRecord {
        DebugRecord {
            recorded_at: Utc::now(),
            year: Some(self.year),
            team: self.team.clone(),
            week: self.week,
            error: Some(error_chain(&self.error)),
        }
    }
}

/// `outer: cause: root cause`
fn error_chain(error: &PipelineError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Window of weeks a team's stats are aggregated over for a game in `week`.
///
/// Stats cover weeks `[STATS_START_WEEK, week)` of the same season. A week-1
/// game has no history yet, so it uses the whole previous season instead.
pub fn stats_window(year: i32, week: u8) -> (i32, u8, u8) {
    if week == 1 {
        (year - 1, STATS_START_WEEK, PRIOR_SEASON_END_WEEK)
    } else {
        (year, STATS_START_WEEK, week)
    }
}

/// Eligible (FBS) team names for a season
pub async fn fetch_team_names<S: StatsSource>(
    source: &S,
    year: i32,
) -> Result<Vec<String>, PipelineError> {
    source.fbs_teams(year).await.map_err(|e| {
        error!(year, error = %e, "failed to fetch FBS teams");
        PipelineError::from(e)
    })
}

/// The team's regular-season game in a week, if it played one
pub async fn fetch_game_info<S: StatsSource>(
    source: &S,
    team: &str,
    week: u8,
    year: i32,
) -> Result<Option<GameInfo>, PipelineError> {
    let query = GameQuery {
        year,
        week,
        team: team.to_string(),
        season_type: SEASON_TYPE.to_string(),
    };

    source.game(&query).await.map_err(|e| {
        error!(year, week, team, error = %e, "failed to fetch game");
        PipelineError::from(e)
    })
}

/// A team's flattened stats going into a game played in `end_week`
pub async fn fetch_season_stats<S: StatsSource>(
    source: &S,
    team: &str,
    year: i32,
    end_week: u8,
    exclude_garbage_time: bool,
) -> Result<Option<SeasonStats>, PipelineError> {
    let (year, start_week, end_week) = stats_window(year, end_week);
    let query = StatsQuery {
        year,
        team: team.to_string(),
        exclude_garbage_time,
        start_week,
        end_week,
    };

    let stats = source.advanced_season_stats(&query).await.map_err(|e| {
        error!(year, team, error = %e, "failed to fetch advanced season stats");
        PipelineError::from(e)
    })?;

    match stats {
        Some(stats) => season_stats_from(&stats)
            .map(Some)
            .map_err(PipelineError::Flatten),
        None => Ok(None),
    }
}

/// Walk every team's schedule for one season and collect a row per distinct game.
///
/// On failure the rows gathered so far travel back inside the `SeasonFailure`.
pub async fn collect_season<S: StatsSource>(
    source: &S,
    settings: &Settings,
    year: i32,
) -> Result<Vec<GameRow>, SeasonFailure> {
    let mut rows = Vec::new();

    let teams = match fetch_team_names(source, year).await {
        Ok(teams) => teams,
        Err(error) => {
            return Err(SeasonFailure {
                rows,
                year,
                team: None,
                week: None,
                error,
            })
        }
    };
    let eligible: HashSet<&str> = teams.iter().map(String::as_str).collect();
    let mut seen_games: HashSet<(String, String)> = HashSet::new();

    info!(year, teams = teams.len(), "processing season");

    for team in &teams {
        for week in settings.weeks.clone() {
            let outcome =
                process_game(source, settings, &eligible, &mut seen_games, team, week, year).await;
            match outcome {
                Ok(Some(row)) => {
                    rows.push(row);
                    info!(year, week, team = %team, games = rows.len(), "processed game");
                }
                Ok(None) => {}
                Err(error) => {
                    return Err(SeasonFailure {
                        rows,
                        year,
                        team: Some(team.clone()),
                        week: Some(week),
                        error,
                    })
                }
            }
        }
    }

    Ok(rows)
}

async fn process_game<S: StatsSource>(
    source: &S,
    settings: &Settings,
    eligible: &HashSet<&str>,
    seen_games: &mut HashSet<(String, String)>,
    team: &str,
    week: u8,
    year: i32,
) -> Result<Option<GameRow>, PipelineError> {
    let Some(game) = fetch_game_info(source, team, week, year).await? else {
        return Ok(None);
    };

    if !eligible.contains(game.home_team.as_str()) || !eligible.contains(game.away_team.as_str()) {
        return Ok(None);
    }

    // Each game shows up on both teams' schedules
    if !seen_games.insert(game.matchup()) {
        return Ok(None);
    }

    let exclude = settings.exclude_garbage_time;

    let Some(home_stats) = fetch_season_stats(source, &game.home_team, year, week, exclude).await?
    else {
        warn!(year, week, team = %game.home_team, "no stats for home team, skipping game");
        return Ok(None);
    };

    let Some(away_stats) = fetch_season_stats(source, &game.away_team, year, week, exclude).await?
    else {
        warn!(year, week, team = %game.away_team, "no stats for away team, skipping game");
        return Ok(None);
    };

    Ok(Some(GameRow {
        game,
        home_stats,
        away_stats,
    }))
}

/// Process every season in order, writing `cfp_data_<year>` after each one.
///
/// The first failure stops the run: the failing season's partial rows go to
/// the fallback file with a debug record, then the error is returned.
/// Returns the total number of rows written.
pub async fn run_seasons<S: StatsSource>(
    source: &S,
    settings: &Settings,
    years: &[i32],
) -> Result<usize, PipelineError> {
    let mut total = 0;

    for &year in years {
        let rows = match collect_season(source, settings, year).await {
            Ok(rows) => rows,
            Err(failure) => {
                dump_partial_season(settings, &failure);
                return Err(failure.error);
            }
        };

        let output = settings.season_output_path(year);
        let saved = save_rows(&rows, &output, &settings.debug_path(), &DebugRecord::empty());
        if let Err(error) = saved {
            let failure = SeasonFailure {
                rows,
                year,
                team: None,
                week: None,
                error,
            };
            dump_partial_season(settings, &failure);
            return Err(failure.error);
        }
        info!(year, games = rows.len(), path = %output.display(), "saved season");
        total += rows.len();
    }

    Ok(total)
}

/// Best-effort: a failure here is logged and never masks the original error.
fn dump_partial_season(settings: &Settings, failure: &SeasonFailure) {
    let fallback = settings.fallback_path();
    warn!(
        year = failure.year,
        games = failure.rows.len(),
        path = %fallback.display(),
        "season failed, saving partial results"
    );

    if let Err(e) = save_rows(
        &failure.rows,
        &fallback,
        &settings.debug_path(),
        &failure.debug_record(),
    ) {
        warn!(error = %e, "failed to save partial results");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_window_regular_week() {
        assert_eq!(stats_window(2021, 5), (2021, 1, 5));
        assert_eq!(stats_window(2021, 2), (2021, 1, 2));
    }

    #[test]
    fn test_stats_window_week_one_uses_prior_season() {
        assert_eq!(stats_window(2021, 1), (2020, 1, 16));
    }
}
