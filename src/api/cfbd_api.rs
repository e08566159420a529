use crate::api::{GameQuery, StatsQuery, StatsSource};
use crate::error::ApiError;
use crate::models::GameInfo;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TEAMS_ENDPOINT: &str = "/teams/fbs";
const GAMES_ENDPOINT: &str = "/games";
const ADVANCED_STATS_ENDPOINT: &str = "/stats/season/advanced";
const INFO_ENDPOINT: &str = "/info";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i32,
    pub school: String,
    pub conference: Option<String>,
    pub classification: Option<Classification>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    Fbs,
    Fcs,
    Ii,
    Iii,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: i32,
    pub season: i32,
    pub week: i32,
    pub completed: Option<bool>,
    pub neutral_site: Option<bool>,
    pub home_team: String,
    pub home_points: Option<i32>,
    pub away_team: String,
    pub away_points: Option<i32>,
}

impl From<GameResult> for GameInfo {
    fn from(game: GameResult) -> Self {
        GameInfo {
            home_team: game.home_team,
            away_team: game.away_team,
            home_points: game.home_points,
            away_points: game.away_points,
        }
    }
}

/// Advanced season stats for one team.
///
/// Decoded from the API's camelCase names but serialized with snake_case
/// names, which become the flattened metric columns.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct AdvancedSeasonStats {
    pub season: i32,
    pub team: String,
    pub conference: Option<String>,
    pub offense: SideStats,
    pub defense: SideStats,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct SideStats {
    pub plays: Option<f64>,
    pub drives: Option<f64>,
    pub ppa: Option<f64>,
    #[serde(alias = "totalPPA")]
    pub total_ppa: Option<f64>,
    pub success_rate: Option<f64>,
    pub explosiveness: Option<f64>,
    pub power_success: Option<f64>,
    pub stuff_rate: Option<f64>,
    pub line_yards: Option<f64>,
    pub line_yards_total: Option<f64>,
    pub second_level_yards: Option<f64>,
    pub second_level_yards_total: Option<f64>,
    pub open_field_yards: Option<f64>,
    pub open_field_yards_total: Option<f64>,
    // sic, the API spells it this way
    pub total_opportunies: Option<f64>,
    pub points_per_opportunity: Option<f64>,
    pub field_position: Option<FieldPosition>,
    pub havoc: Option<Havoc>,
    pub standard_downs: Option<DownStats>,
    pub passing_downs: Option<DownStats>,
    pub rushing_plays: Option<PlayTypeStats>,
    pub passing_plays: Option<PlayTypeStats>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct FieldPosition {
    pub average_start: Option<f64>,
    pub average_predicted_points: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Havoc {
    pub total: Option<f64>,
    pub front_seven: Option<f64>,
    pub db: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct DownStats {
    pub rate: Option<f64>,
    pub ppa: Option<f64>,
    pub success_rate: Option<f64>,
    pub explosiveness: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PlayTypeStats {
    pub rate: Option<f64>,
    pub ppa: Option<f64>,
    #[serde(alias = "totalPPA")]
    pub total_ppa: Option<f64>,
    pub success_rate: Option<f64>,
    pub explosiveness: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InfoResult {
    pub patron_level: u32,
    pub remaining_calls: u32,
}

pub struct CfbdApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CfbdApiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get<T, Q>(&self, endpoint: &'static str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "requesting");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { endpoint, source })
    }

    pub async fn fetch_fbs_teams(&self, year: i32) -> Result<Vec<Team>, ApiError> {
        self.get(TEAMS_ENDPOINT, &[("year", year)]).await
    }

    pub async fn fetch_games(&self, query: &GameQuery) -> Result<Vec<GameResult>, ApiError> {
        self.get(GAMES_ENDPOINT, query).await
    }

    pub async fn fetch_advanced_season_stats(
        &self,
        query: &StatsQuery,
    ) -> Result<Vec<AdvancedSeasonStats>, ApiError> {
        self.get(ADVANCED_STATS_ENDPOINT, query).await
    }

    /// Check remaining calls on the College Football Data API
    pub async fn check_usage(&self) -> Result<InfoResult, ApiError> {
        let no_query: [(&str, &str); 0] = [];
        self.get(INFO_ENDPOINT, &no_query).await
    }
}

impl StatsSource for CfbdApiClient {
    async fn fbs_teams(&self, year: i32) -> Result<Vec<String>, ApiError> {
        let teams = self.fetch_fbs_teams(year).await?;
        Ok(teams.into_iter().map(|t| t.school).collect())
    }

    async fn game(&self, query: &GameQuery) -> Result<Option<GameInfo>, ApiError> {
        let games = self.fetch_games(query).await?;
        Ok(games.into_iter().next().map(GameInfo::from))
    }

    async fn advanced_season_stats(
        &self,
        query: &StatsQuery,
    ) -> Result<Option<AdvancedSeasonStats>, ApiError> {
        let stats = self.fetch_advanced_season_stats(query).await?;
        Ok(stats.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_BASE_URL, SEASON_TYPE};

    const STATS_JSON: &str = r#"[{
        "season": 2020,
        "team": "Alabama",
        "conference": "SEC",
        "offense": {
            "plays": 850, "drives": 130, "ppa": 0.41, "totalPPA": 348.5,
            "successRate": 0.53, "explosiveness": 1.2, "powerSuccess": 0.8,
            "stuffRate": 0.12, "lineYards": 3.4, "lineYardsTotal": 1200.0,
            "secondLevelYards": 1.1, "secondLevelYardsTotal": 400.0,
            "openFieldYards": 1.4, "openFieldYardsTotal": 500.0,
            "totalOpportunies": 90, "pointsPerOpportunity": 5.6,
            "fieldPosition": {"averageStart": 72.1, "averagePredictedPoints": 1.3},
            "havoc": {"total": 0.11, "frontSeven": 0.06, "db": 0.05},
            "standardDowns": {"rate": 0.6, "ppa": 0.35, "successRate": 0.55, "explosiveness": 1.1},
            "passingDowns": {"rate": 0.4, "ppa": 0.5, "successRate": 0.4, "explosiveness": 1.7},
            "rushingPlays": {"rate": 0.5, "ppa": 0.2, "totalPPA": 90.0, "successRate": 0.5, "explosiveness": 0.9},
            "passingPlays": {"rate": 0.5, "ppa": 0.6, "totalPPA": 250.0, "successRate": 0.55, "explosiveness": 1.5}
        },
        "defense": {
            "plays": 800, "drives": 128, "ppa": 0.05, "totalPPA": 40.0,
            "successRate": 0.38, "explosiveness": 1.0,
            "havoc": {"total": 0.17, "frontSeven": 0.1, "db": 0.07},
            "rushingPlays": {"rate": 0.5, "ppa": null, "totalPPA": 10.0, "successRate": 0.36, "explosiveness": 0.8}
        }
    }]"#;

    #[test]
    fn test_decode_advanced_season_stats() {
        let stats: Vec<AdvancedSeasonStats> = serde_json::from_str(STATS_JSON).unwrap();
        assert_eq!(stats.len(), 1);
        let stats = &stats[0];
        assert_eq!(stats.team, "Alabama");
        assert_eq!(stats.offense.total_ppa, Some(348.5));
        assert_eq!(stats.offense.total_opportunies, Some(90.0));
        assert_eq!(stats.offense.havoc.as_ref().unwrap().front_seven, Some(0.06));
        assert!(stats.defense.standard_downs.is_none());
        assert_eq!(stats.defense.rushing_plays.as_ref().unwrap().ppa, None);
    }

    #[test]
    fn test_stats_serialize_with_snake_case_names() {
        let stats: Vec<AdvancedSeasonStats> = serde_json::from_str(STATS_JSON).unwrap();
        let value = serde_json::to_value(&stats[0].offense).unwrap();
        assert!(value.get("success_rate").is_some());
        assert!(value.get("total_ppa").is_some());
        assert!(value["standard_downs"].get("success_rate").is_some());
    }

    #[test]
    fn test_decode_games_and_teams() {
        let games: Vec<GameResult> = serde_json::from_str(
            r#"[{"id": 401, "season": 2021, "week": 2, "seasonType": "regular",
                 "completed": true, "neutralSite": false,
                 "homeTeam": "Georgia", "homePoints": 24,
                 "awayTeam": "Alabama", "awayPoints": null}]"#,
        )
        .unwrap();
        let info = GameInfo::from(games[0].clone());
        assert_eq!(info.home_team, "Georgia");
        assert_eq!(info.home_points, Some(24));
        assert_eq!(info.away_points, None);

        let teams: Vec<Team> = serde_json::from_str(
            r#"[{"id": 333, "school": "Alabama", "mascot": "Crimson Tide",
                 "conference": "SEC", "classification": "fbs"}]"#,
        )
        .unwrap();
        assert_eq!(teams[0].school, "Alabama");
        assert_eq!(teams[0].classification, Some(Classification::Fbs));
    }

    #[test]
    fn test_query_encoding() {
        let query = StatsQuery {
            year: 2021,
            team: "Texas A&M".into(),
            exclude_garbage_time: true,
            start_week: 1,
            end_week: 5,
        };
        let client = Client::new();
        let request = client
            .get(format!("{}{}", API_BASE_URL, ADVANCED_STATS_ENDPOINT))
            .query(&query)
            .build()
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("year=2021&team=Texas+A%26M&excludeGarbageTime=true&startWeek=1&endWeek=5")
        );

        let query = GameQuery {
            year: 2021,
            week: 3,
            team: "Georgia".into(),
            season_type: SEASON_TYPE.into(),
        };
        let request = client
            .get(format!("{}{}", API_BASE_URL, GAMES_ENDPOINT))
            .query(&query)
            .build()
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("year=2021&week=3&team=Georgia&seasonType=regular")
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_fbs_teams() {
        dotenv::dotenv().ok();
        let api_key = std::env::var("CFBD_API_KEY").expect("CFBD_API_KEY not set");
        let client = CfbdApiClient::new(api_key, API_BASE_URL.to_string());
        let teams = client.fbs_teams(2021).await.unwrap();
        assert!(teams.iter().any(|t| t == "Alabama"));
    }
}
