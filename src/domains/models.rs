//! Row records and response views shared by the tool definitions.
//!
//! Row structs mirror the camelCase column aliases used in the queries and
//! are decoded with [`crate::core::store::decode_rows`]. View structs are
//! what the tools serialize back to clients.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domains::stats::{OutcomeTally, Scoreline, ScorelineCount};

// ============================================================================
// Rows
// ============================================================================

/// Best scorer of a month.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUserRow {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub total_points: i64,
}

/// A fixture resolved by name lookup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRow {
    pub id: i64,
    pub name: String,
    pub start: String,
    #[serde(default, deserialize_with = "flag")]
    pub finished: bool,
}

/// A guess with its author, for the per-fixture listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRow {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    pub home_goals: u32,
    pub away_goals: u32,
    pub created_at: String,
}

/// An upcoming fixture with team and league names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingFixtureRow {
    pub id: i64,
    pub name: String,
    pub start: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
}

/// A finished fixture joined with its final score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedFixtureRow {
    pub id: i64,
    pub name: String,
    pub start: String,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
}

impl FinishedFixtureRow {
    pub fn final_score(&self) -> Option<Scoreline> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some(Scoreline::new(home, away)),
            _ => None,
        }
    }
}

/// A guess keyed by fixture, for batched lookups over several fixtures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureGuessRow {
    pub id: i64,
    pub fixture_id: i64,
    pub home_goals: u32,
    pub away_goals: u32,
    pub created_at: String,
}

impl FixtureGuessRow {
    pub fn scoreline(&self) -> Scoreline {
        Scoreline::new(self.home_goals, self.away_goals)
    }
}

/// MariaDB reports BOOLEAN columns as TINYINT.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

// ============================================================================
// Views
// ============================================================================

/// One labelled counter of the outcome breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub label: String,
    pub value: usize,
}

/// An upcoming fixture with its guess statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingGame {
    pub id: i64,
    pub home: String,
    pub away: String,
    pub date: String,
    pub championship: String,
    pub guesses: usize,
    pub avg_score: String,
    pub stats: Vec<StatEntry>,
    pub most_guessed_scores: Vec<ScorelineCount>,
}

impl UpcomingGame {
    /// Outcome counters labelled the way the guess app shows them.
    pub fn outcome_stats(home: &str, away: &str, tally: OutcomeTally) -> Vec<StatEntry> {
        vec![
            StatEntry {
                label: format!("Vitória {}", home),
                value: tally.home_wins,
            },
            StatEntry {
                label: "Empate".to_string(),
                value: tally.draws,
            },
            StatEntry {
                label: format!("Vitória {}", away),
                value: tally.away_wins,
            },
        ]
    }
}

/// A guess on a finished fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGuess {
    pub guess_id: i64,
    pub home_goals: u32,
    pub away_goals: u32,
    pub created_at: String,
}

/// A finished fixture with its final score and every guess placed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGame {
    pub fixture_id: i64,
    pub match_name: String,
    pub match_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    pub final_score: Option<String>,
    pub guesses_count: usize,
    pub exact_guesses: usize,
    pub guesses: Vec<FinishedGuess>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::decode_rows;
    use crate::core::store::fake::row;
    use serde_json::json;

    #[test]
    fn test_fixture_row_accepts_tinyint_flag() {
        let rows = vec![
            row(json!({"id": 1, "name": "Flamengo x Vasco", "start": "2025-05-04 19:00:00", "finished": 1})),
            row(json!({"id": 2, "name": "Santos x Bahia", "start": "2025-05-05 19:00:00", "finished": false})),
        ];
        let fixtures: Vec<FixtureRow> = decode_rows(rows).unwrap();
        assert!(fixtures[0].finished);
        assert!(!fixtures[1].finished);
    }

    #[test]
    fn test_final_score_needs_both_sides() {
        let rows = vec![row(json!({
            "id": 3, "name": "Grêmio x Inter", "start": "2025-04-01 16:00:00",
            "homeGoals": 2, "awayGoals": null
        }))];
        let fixtures: Vec<FinishedFixtureRow> = decode_rows(rows).unwrap();
        assert_eq!(fixtures[0].final_score(), None);
    }

    #[test]
    fn test_upcoming_game_serializes_camel_case() {
        let game = UpcomingGame {
            id: 9,
            home: "Palmeiras".to_string(),
            away: "Corinthians".to_string(),
            date: "2025-06-01 21:30:00".to_string(),
            championship: "Brasileirão".to_string(),
            guesses: 0,
            avg_score: "0 x 0".to_string(),
            stats: UpcomingGame::outcome_stats("Palmeiras", "Corinthians", OutcomeTally::default()),
            most_guessed_scores: Vec::new(),
        };
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["avgScore"], "0 x 0");
        assert_eq!(value["stats"][0]["label"], "Vitória Palmeiras");
        assert_eq!(value["stats"][1]["label"], "Empate");
        assert!(value["mostGuessedScores"].as_array().unwrap().is_empty());
    }
}
