//! Monthly top user tool definition.
//!
//! Sums the point entries of a calendar month per user and returns the best
//! scorer, together with the month and year actually used.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::core::store::{QueryParam, decode_rows};
use crate::core::time_window::month_bounds;
use crate::domains::models::TopUserRow;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{month_top_user, structured_result};
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

const TOP_USER_SQL: &str = "\
SELECT u.id AS userId, u.name AS name, u.email AS email, \
CAST(SUM(p.points) AS SIGNED) AS totalPoints \
FROM userPoints p \
JOIN users u ON u.id = p.userId \
WHERE p.createdAt >= ? AND p.createdAt < ? \
GROUP BY u.id, u.name, u.email \
ORDER BY totalPoints DESC \
LIMIT 1";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the monthly top user tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MonthTopUserParams {
    /// Month number (1-12). Defaults to the current UTC month.
    #[serde(default)]
    #[schemars(range(min = 1, max = 12))]
    pub month: Option<u32>,

    /// Four-digit year (1970-9999). Defaults to the current UTC year.
    #[serde(default)]
    #[schemars(range(min = 1970, max = 9999))]
    pub year: Option<i32>,
}

/// Structured payload returned next to the narrative.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthTopUserPayload {
    month: u32,
    year: i32,
    top_user: Option<TopUserRow>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Monthly top user tool.
pub struct MonthTopUserTool;

impl MonthTopUserTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-month-top-user";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retorna o usuário com maior pontuação no mês.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<MonthTopUserParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for MonthTopUserTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::empty()
            .optional("month", FieldKind::Integer { min: 1, max: 12 })
            .optional("year", FieldKind::Integer { min: 1970, max: 9999 })
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao consultar ranking."
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: MonthTopUserParams = parse_arguments(arguments)?;

        let window = month_bounds(params.year, params.month).ok_or_else(|| {
            ToolError::invalid_arguments(format!(
                "no such month: {:?}/{:?}",
                params.month, params.year
            ))
        })?;

        info!("Top user lookup for {}/{}", window.month, window.year);

        let rows = ctx
            .store
            .fetch(
                TOP_USER_SQL,
                &[
                    QueryParam::from(window.start_literal()),
                    QueryParam::from(window.end_literal()),
                ],
            )
            .await?;
        let top = decode_rows::<TopUserRow>(rows)?.into_iter().next();

        let text = month_top_user(&window, top.as_ref());
        Ok(structured_result(
            text,
            &MonthTopUserPayload {
                month: window.month,
                year: window.year,
                top_user: top,
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

    #[tokio::test]
    async fn test_top_user_found() {
        let store = Arc::new(FakeExecutor::new().with_rows(vec![json!({
            "userId": 4, "name": "Bruno", "email": "bruno@palpite.fc", "totalPoints": 87
        })]));
        let result = MonthTopUserTool
            .execute(json!({"month": 12, "year": 2024}), &context(store.clone()))
            .await
            .unwrap();

        assert_eq!(
            text_of(&result),
            "Top de 12/2024: Bruno (bruno@palpite.fc) com 87 pontos."
        );
        let payload = result.structured_content.unwrap();
        assert_eq!(payload["month"], 12);
        assert_eq!(payload["year"], 2024);
        assert_eq!(payload["topUser"]["totalPoints"], 87);

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].params,
            vec![
                QueryParam::Text("2024-12-01 00:00:00".to_string()),
                QueryParam::Text("2025-01-01 00:00:00".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_points_is_not_an_error() {
        let store = Arc::new(FakeExecutor::new().with_rows(vec![]));
        let result = MonthTopUserTool
            .execute(json!({"month": 2, "year": 2023}), &context(store))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "Nenhum ponto encontrado em 2/2023.");
        assert!(result.structured_content.unwrap()["topUser"].is_null());
    }

    #[tokio::test]
    async fn test_defaults_report_the_month_used() {
        let store = Arc::new(FakeExecutor::new());
        let result = MonthTopUserTool
            .execute(json!({}), &context(store))
            .await
            .unwrap();

        let payload = result.structured_content.unwrap();
        let month = payload["month"].as_u64().unwrap();
        assert!((1..=12).contains(&month));
        assert!(payload["year"].as_i64().unwrap() >= 2024);
    }
}
