//! Upcoming fixtures tool definition.
//!
//! Lists the next fixtures after "now" in the local offset, each annotated
//! with guess count, average scoreline, outcome breakdown and the most
//! guessed scorelines.

use rmcp::model::{CallToolResult, Tool};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::common::guesses_by_fixture;
use crate::core::store::{QueryParam, decode_rows};
use crate::core::time_window::sql_literal;
use crate::domains::models::{FixtureGuessRow, UpcomingFixtureRow, UpcomingGame};
use crate::domains::stats::{
    DEFAULT_TOP_SCORELINES, Scoreline, average_scoreline, outcome_tally, top_scorelines,
};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{structured_result, upcoming_games};
use crate::domains::tools::handlers::{NoParams, ToolContext, ToolHandler, tool_model};

/// How many fixtures are listed.
pub const UPCOMING_LIMIT: u32 = 5;

const UPCOMING_SQL: &str = "\
SELECT f.id AS id, f.name AS name, f.start AS start, \
t1.name AS homeTeam, t2.name AS awayTeam, l.name AS league \
FROM fixtures f \
LEFT JOIN teams t1 ON t1.id = f.homeId \
LEFT JOIN teams t2 ON t2.id = f.awayId \
LEFT JOIN leagues l ON l.id = f.leagueId \
WHERE f.start > ? \
ORDER BY f.start ASC \
LIMIT ?";

/// Payload shaped as the `update_upcoming_games` action of the guess app.
#[derive(Debug, Serialize)]
struct UpcomingPayload {
    name: &'static str,
    params: UpcomingParams,
}

#[derive(Debug, Serialize)]
struct UpcomingParams {
    games: Vec<UpcomingGame>,
}

/// Upcoming fixtures tool.
pub struct NextFixturesTool;

impl NextFixturesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-today-next-fixtures";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retorna os próximos 5 jogos a partir de agora, com quantidade de palpites, média de placar, estatísticas de resultado e placares mais apostados.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<NoParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Split "Home x Away" when the team joins are missing.
fn teams_from_name(name: &str) -> (String, String) {
    match name.split_once(" x ") {
        Some((home, away)) => (home.trim().to_string(), away.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

fn build_game(fixture: UpcomingFixtureRow, guesses: &[FixtureGuessRow]) -> UpcomingGame {
    let (fallback_home, fallback_away) = teams_from_name(&fixture.name);
    let home = fixture.home_team.unwrap_or(fallback_home);
    let away = fixture.away_team.unwrap_or(fallback_away);

    let scorelines: Vec<Scoreline> = guesses.iter().map(FixtureGuessRow::scoreline).collect();

    UpcomingGame {
        id: fixture.id,
        stats: UpcomingGame::outcome_stats(&home, &away, outcome_tally(&scorelines)),
        home,
        away,
        date: fixture.start,
        championship: fixture.league.unwrap_or_default(),
        guesses: scorelines.len(),
        avg_score: average_scoreline(&scorelines).to_string(),
        most_guessed_scores: top_scorelines(&scorelines, DEFAULT_TOP_SCORELINES),
    }
}

#[async_trait::async_trait]
impl ToolHandler for NextFixturesTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao consultar próximos jogos."
    }

    #[instrument(skip_all)]
    async fn execute(&self, _arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let now = sql_literal(ctx.clock.now_shifted());
        info!("Upcoming fixtures after {}", now);

        let fixtures = decode_rows::<UpcomingFixtureRow>(
            ctx.store
                .fetch(
                    UPCOMING_SQL,
                    &[QueryParam::from(now), QueryParam::from(UPCOMING_LIMIT)],
                )
                .await?,
        )?;

        let ids: Vec<i64> = fixtures.iter().map(|f| f.id).collect();
        let mut guesses = guesses_by_fixture(ctx.store.as_ref(), &ids).await?;

        let games: Vec<UpcomingGame> = fixtures
            .into_iter()
            .map(|fixture| {
                let fixture_guesses = guesses.remove(&fixture.id).unwrap_or_default();
                build_game(fixture, &fixture_guesses)
            })
            .collect();

        let text = upcoming_games(&games);
        Ok(structured_result(
            text,
            &UpcomingPayload {
                name: "update_upcoming_games",
                params: UpcomingParams { games },
            },
        ))
    }
}
