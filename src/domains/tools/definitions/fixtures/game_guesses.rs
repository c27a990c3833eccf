//! Game guesses tool definition.
//!
//! Resolves one fixture by a fuzzy name match, either on an explicit date or
//! as the nearest fixture still to be played, and lists its guesses.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::core::store::{QueryParam, decode_rows};
use crate::core::time_window::sql_literal;
use crate::domains::models::{FixtureRow, GuessRow};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{fixture_not_found, game_guesses, structured_result, text_result};
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

const FIXTURE_ON_DATE_SQL: &str = "\
SELECT f.id AS id, f.name AS name, f.start AS start, f.finished AS finished \
FROM fixtures f \
WHERE f.name LIKE ? AND DATE(f.start) = ? \
ORDER BY f.start ASC \
LIMIT 1";

const NEXT_FIXTURE_SQL: &str = "\
SELECT f.id AS id, f.name AS name, f.start AS start, f.finished AS finished \
FROM fixtures f \
WHERE f.name LIKE ? AND f.start > ? \
ORDER BY f.start ASC \
LIMIT 1";

const GUESSES_SQL: &str = "\
SELECT g.id AS id, g.userId AS userId, u.name AS userName, \
g.homeGoals AS homeGoals, g.awayGoals AS awayGoals, g.createdAt AS createdAt \
FROM guesses g \
LEFT JOIN users u ON u.id = g.userId \
WHERE g.fixtureId = ? \
ORDER BY g.createdAt ASC, g.id ASC";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the game guesses tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameGuessesParams {
    /// Team name or fixture display name ("Team A x Team B"); matched fuzzily.
    #[schemars(length(min = 1))]
    pub team_name: String,

    /// Fixture date as YYYY-MM-DD. When omitted, the next fixture to be
    /// played is used.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
struct GameGuessesPayload {
    fixture: FixtureRow,
    count: usize,
    guesses: Vec<GuessRow>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Game guesses tool.
pub struct GameGuessesTool;

impl GameGuessesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-game-guesses";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retorna os palpites feitos para um jogo específico, buscado pelo nome do time e, opcionalmente, pela data.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<GameGuessesParams>(Self::NAME, Self::DESCRIPTION)
    }
}

/// `LIKE` pattern matching the name anywhere, with wildcards escaped.
fn like_pattern(name: &str) -> String {
    let escaped = name
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait::async_trait]
impl ToolHandler for GameGuessesTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::empty()
            .required("teamName", FieldKind::Text { min_len: 1 })
            .optional("date", FieldKind::Date)
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao consultar palpites."
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: GameGuessesParams = parse_arguments(arguments)?;
        let pattern = like_pattern(&params.team_name);

        let rows = match &params.date {
            Some(date) => {
                ctx.store
                    .fetch(
                        FIXTURE_ON_DATE_SQL,
                        &[QueryParam::from(pattern), QueryParam::from(date.as_str())],
                    )
                    .await?
            }
            None => {
                let now = sql_literal(ctx.clock.now_shifted());
                ctx.store
                    .fetch(NEXT_FIXTURE_SQL, &[QueryParam::from(pattern), QueryParam::from(now)])
                    .await?
            }
        };

        let Some(fixture) = decode_rows::<FixtureRow>(rows)?.into_iter().next() else {
            info!("No fixture matches '{}'", params.team_name);
            return Ok(text_result(fixture_not_found(
                &params.team_name,
                params.date.as_deref(),
            )));
        };

        info!("Listing guesses of fixture {} ({})", fixture.id, fixture.name);

        let guesses = decode_rows::<GuessRow>(
            ctx.store
                .fetch(GUESSES_SQL, &[QueryParam::from(fixture.id)])
                .await?,
        )?;

        let text = game_guesses(&fixture, &guesses);
        Ok(structured_result(
            text,
            &GameGuessesPayload {
                count: guesses.len(),
                fixture,
                guesses,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScheduleConfig;
    use crate::core::store::fake::FakeExecutor;
    use crate::domains::insights::InsightMemo;
    use serde_json::json;
    use std::sync::Arc;

    fn context(store: Arc<FakeExecutor>) -> ToolContext {
        ToolContext::new(store, Arc::new(InsightMemo::new()), &ScheduleConfig::default())
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    fn fixture() -> Value {
        json!({"id": 31, "name": "Flamengo x Vasco", "start": "2025-05-04 19:00:00", "finished": 0})
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" Vasco "), "%Vasco%");
        assert_eq!(like_pattern("100%_x"), "%100\\%\\_x%");
    }

    #[tokio::test]
    async fn test_lookup_by_date() {
        let store = Arc::new(
            FakeExecutor::new()
                .with_rows(vec![fixture()])
                .with_rows(vec![
                    json!({"id": 1, "userId": 7, "userName": "Ana", "homeGoals": 2, "awayGoals": 0, "createdAt": "2025-05-01 09:00:00"}),
                    json!({"id": 2, "userId": 8, "userName": null, "homeGoals": 1, "awayGoals": 1, "createdAt": "2025-05-02 09:00:00"}),
                ]),
        );
        let result = GameGuessesTool
            .execute(
                json!({"teamName": "Vasco", "date": "2025-05-04"}),
                &context(store.clone()),
            )
            .await
            .unwrap();

        let payload = result.structured_content.clone().unwrap();
        assert_eq!(payload["count"], 2);
        assert_eq!(payload["fixture"]["id"], 31);
        assert_eq!(payload["guesses"][0]["userName"], "Ana");

        let text = text_of(&result);
        assert!(text.contains("Palpites para Flamengo x Vasco"));
        assert!(text.contains("usuário 8: 1 x 1"));

        let calls = store.calls();
        assert!(calls[0].sql.contains("DATE(f.start) = ?"));
        assert_eq!(
            calls[0].params,
            vec![
                QueryParam::Text("%Vasco%".to_string()),
                QueryParam::Text("2025-05-04".to_string())
            ]
        );
        assert_eq!(calls[1].params, vec![QueryParam::Int(31)]);
    }

    #[tokio::test]
    async fn test_without_date_uses_next_fixture() {
        let store = Arc::new(FakeExecutor::new().with_rows(vec![fixture()]).with_rows(vec![]));
        let result = GameGuessesTool
            .execute(json!({"teamName": "Flamengo"}), &context(store.clone()))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert!(text_of(&result).starts_with("Nenhum palpite registrado"));
        assert!(store.calls()[0].sql.contains("f.start > ?"));
    }

    #[tokio::test]
    async fn test_not_found_is_a_successful_result() {
        let store = Arc::new(FakeExecutor::new().with_rows(vec![]));
        let result = GameGuessesTool
            .execute(
                json!({"teamName": "Íbis", "date": "2025-01-01"}),
                &context(store.clone()),
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text_of(&result),
            "Nenhum jogo encontrado com 'Íbis' na data 2025-01-01."
        );
        // Guesses are never queried for a missing fixture.
        assert_eq!(store.call_count(), 1);
    }
}
