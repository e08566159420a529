use crate::api::cfbd_api::AdvancedSeasonStats;
use crate::models::SeasonStats;
use serde_json::Value;
use std::collections::BTreeMap;

/// Play and drive counts are bookkeeping, not features
pub const BOOKKEEPING_KEYS: [&str; 4] = [
    "offense_drives",
    "offense_plays",
    "defense_drives",
    "defense_plays",
];

/// Flatten nested JSON into `parent_child_grandchild` keys.
/// Nulls and non-numeric leaves are dropped.
pub fn flatten_into(value: &Value, parent_key: &str, out: &mut BTreeMap<String, f64>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let new_key = if parent_key.is_empty() {
                    key.clone()
                } else {
                    format!("{}_{}", parent_key, key)
                };
                flatten_into(child, &new_key, out);
            }
        }
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                out.insert(parent_key.to_string(), v);
            }
        }
        _ => {}
    }
}

/// Totals are skewed by games played; havoc totals are already rates.
pub fn is_feature_metric(key: &str) -> bool {
    !key.contains("total") || key.contains("havoc")
}

/// Turn an API stats record into a filtered, flat snapshot
pub fn season_stats_from(stats: &AdvancedSeasonStats) -> Result<SeasonStats, serde_json::Error> {
    let mut metrics = BTreeMap::new();
    flatten_into(&serde_json::to_value(&stats.offense)?, "offense", &mut metrics);
    flatten_into(&serde_json::to_value(&stats.defense)?, "defense", &mut metrics);

    metrics.retain(|key, _| is_feature_metric(key));
    for key in BOOKKEEPING_KEYS {
        metrics.remove(key);
    }

    Ok(SeasonStats::new(metrics))
}
