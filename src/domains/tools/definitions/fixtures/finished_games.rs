//! Finished games tool definition.
//!
//! Lists the most recent finished fixtures before a cutoff, each with its
//! final score, every guess placed on it and how many guesses hit the exact
//! score.

use chrono::NaiveDateTime;
use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::common::guesses_by_fixture;
use crate::core::store::{QueryParam, decode_rows};
use crate::core::time_window::sql_literal;
use crate::domains::models::{FinishedFixtureRow, FinishedGame, FinishedGuess, FixtureGuessRow};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{finished_games, structured_result};
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

pub const DEFAULT_LIMIT: u32 = 5;
pub const MAX_LIMIT: u32 = 10;

const FINISHED_SQL: &str = "\
SELECT f.id AS id, f.name AS name, f.start AS start, l.name AS league, \
m.homeGoals AS homeGoals, m.awayGoals AS awayGoals \
FROM fixtures f \
LEFT JOIN matches m ON m.fixtureId = f.id \
LEFT JOIN leagues l ON l.id = f.leagueId \
WHERE f.finished = 1 AND f.start < ? \
ORDER BY f.start DESC \
LIMIT ?";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the finished games tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FinishedGamesStatsParams {
    /// How many games to return (1-10, default 5).
    #[serde(default)]
    #[schemars(range(min = 1, max = 10))]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct FinishedPayload {
    cutoff: String,
    games: Vec<FinishedGame>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Finished games tool.
pub struct FinishedGamesStatsTool;

impl FinishedGamesStatsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-finished-games-stats";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retorna análise de jogos finalizados, incluindo placar, liga, número de palpites e número de palpites exatos.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<FinishedGamesStatsParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Configured cutoff, or the end of the current local day.
    fn cutoff(ctx: &ToolContext) -> NaiveDateTime {
        ctx.finished_cutoff
            .unwrap_or_else(|| ctx.clock.end_of_local_day())
    }
}

fn build_game(fixture: FinishedFixtureRow, guesses: Vec<FixtureGuessRow>) -> FinishedGame {
    let final_score = fixture.final_score();
    let exact_guesses = match final_score {
        Some(score) => guesses.iter().filter(|g| g.scoreline() == score).count(),
        None => 0,
    };

    FinishedGame {
        fixture_id: fixture.id,
        match_name: fixture.name,
        match_date_time: fixture.start,
        league: fixture.league,
        final_score: final_score.map(|score| score.to_string()),
        guesses_count: guesses.len(),
        exact_guesses,
        guesses: guesses
            .into_iter()
            .map(|g| FinishedGuess {
                guess_id: g.id,
                home_goals: g.home_goals,
                away_goals: g.away_goals,
                created_at: g.created_at,
            })
            .collect(),
    }
}

#[async_trait::async_trait]
impl ToolHandler for FinishedGamesStatsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::empty().optional(
            "limit",
            FieldKind::Integer {
                min: 1,
                max: i64::from(MAX_LIMIT),
            },
        )
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao consultar jogos finalizados."
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: FinishedGamesStatsParams = parse_arguments(arguments)?;
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
        let cutoff = sql_literal(Self::cutoff(ctx));

        info!("Finished games before {} (limit {})", cutoff, limit);

        let fixtures = decode_rows::<FinishedFixtureRow>(
            ctx.store
                .fetch(
                    FINISHED_SQL,
                    &[QueryParam::from(cutoff.as_str()), QueryParam::from(limit)],
                )
                .await?,
        )?;

        let ids: Vec<i64> = fixtures.iter().map(|f| f.id).collect();
        let mut guesses = guesses_by_fixture(ctx.store.as_ref(), &ids).await?;

        let games: Vec<FinishedGame> = fixtures
            .into_iter()
            .map(|fixture| {
                let fixture_guesses = guesses.remove(&fixture.id).unwrap_or_default();
                build_game(fixture, fixture_guesses)
            })
            .collect();

        let text = finished_games(&games);
        Ok(structured_result(text, &FinishedPayload { cutoff, games }))
    }
}
