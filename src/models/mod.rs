use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a single regular-season game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub home_team: String,
    pub away_team: String,
    pub home_points: Option<i32>,
    pub away_points: Option<i32>,
}

impl GameInfo {
    /// Home/away pair used to recognise the same game seen from both schedules
    pub fn matchup(&self) -> (String, String) {
        (self.home_team.clone(), self.away_team.clone())
    }
}

/// A team's cumulative advanced stats, flattened to `offense_*` / `defense_*` metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    metrics: BTreeMap<String, f64>,
}

impl SeasonStats {
    pub fn new(metrics: BTreeMap<String, f64>) -> Self {
        Self { metrics }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.metrics.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// One output row: a game joined with both teams' stats going into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    pub game: GameInfo,
    pub home_stats: SeasonStats,
    pub away_stats: SeasonStats,
}

impl GameRow {
    /// Column name / cell pairs in output order: home stats, away stats, then the game itself.
    pub fn cells(&self) -> Vec<(String, String)> {
        let mut cells = Vec::with_capacity(self.home_stats.len() + self.away_stats.len() + 4);

        for (key, value) in self.home_stats.iter() {
            cells.push((format!("home_{}", key), value.to_string()));
        }
        for (key, value) in self.away_stats.iter() {
            cells.push((format!("away_{}", key), value.to_string()));
        }

        cells.push(("home_team".to_string(), self.game.home_team.clone()));
        cells.push(("away_team".to_string(), self.game.away_team.clone()));
        cells.push(("home_points".to_string(), points_cell(self.game.home_points)));
        cells.push(("away_points".to_string(), points_cell(self.game.away_points)));

        cells
    }
}

fn points_cell(points: Option<i32>) -> String {
    points.map(|p| p.to_string()).unwrap_or_default()
}

/// Diagnostic record written to `debug.txt` alongside every CSV write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugRecord {
    pub recorded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DebugRecord {
    pub fn empty() -> Self {
        Self {
            recorded_at: Utc::now(),
            year: None,
            team: None,
            week: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pairs: &[(&str, f64)]) -> SeasonStats {
        SeasonStats::new(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_row_cells_prefix_and_order() {
        let row = GameRow {
            game: GameInfo {
                home_team: "Georgia".into(),
                away_team: "Alabama".into(),
                home_points: Some(24),
                away_points: None,
            },
            home_stats: stats(&[("offense_ppa", 0.25), ("defense_ppa", 0.1)]),
            away_stats: stats(&[("offense_ppa", 0.3)]),
        };

        let cells = row.cells();
        let keys: Vec<&str> = cells.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "home_defense_ppa",
                "home_offense_ppa",
                "away_offense_ppa",
                "home_team",
                "away_team",
                "home_points",
                "away_points",
            ]
        );
        assert_eq!(cells[1].1, "0.25");
        assert_eq!(cells[5].1, "24");
        assert_eq!(cells[6].1, "");
    }

    #[test]
    fn test_empty_debug_record_only_has_timestamp() {
        let json = serde_json::to_value(DebugRecord::empty()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("recorded_at"));
    }
}
