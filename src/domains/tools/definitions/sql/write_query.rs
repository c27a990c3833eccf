//! Write query tool definition.

use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;
use tracing::{info, instrument};

use super::guard::ensure_write;
use super::read_query::QueryParams;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::structured_result;
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

/// Write query tool - runs one mutating statement as-is.
pub struct WriteQueryTool;

impl WriteQueryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "write-query";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Executa INSERT, UPDATE ou DELETE no banco e retorna as linhas afetadas.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<QueryParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for WriteQueryTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::empty().required("query", FieldKind::Text { min_len: 1 })
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao executar comando."
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: QueryParams = parse_arguments(arguments)?;
        ensure_write(&params.query)?;

        let outcome = ctx.store.execute(&params.query, &[]).await?;
        info!("Write query affected {} rows", outcome.rows_affected);

        let text = serde_json::to_string_pretty(&outcome)
            .map_err(|e| ToolError::internal(e.to_string()))?;
        Ok(structured_result(text, &outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScheduleConfig;
    use crate::core::store::ExecOutcome;
    use crate::core::store::fake::FakeExecutor;
    use crate::domains::insights::InsightMemo;
    use serde_json::json;
    use std::sync::Arc;
    use tokio_test::assert_err;

    fn context(store: Arc<FakeExecutor>) -> ToolContext {
        ToolContext::new(store, Arc::new(InsightMemo::new()), &ScheduleConfig::default())
    }

    #[tokio::test]
    async fn test_outcome_reported() {
        let store = Arc::new(FakeExecutor::new().with_outcome(ExecOutcome {
            rows_affected: 1,
            last_insert_id: 99,
        }));
        let result = WriteQueryTool
            .execute(
                json!({"query": "INSERT INTO userPoints (userId, points) VALUES (1, 3)"}),
                &context(store),
            )
            .await
            .unwrap();

        assert_eq!(
            result.structured_content.unwrap(),
            json!({"rowsAffected": 1, "lastInsertId": 99})
        );
    }

    #[tokio::test]
    async fn test_select_rejected_before_store() {
        let store = Arc::new(FakeExecutor::new());
        let err = assert_err!(
            WriteQueryTool
                .execute(json!({"query": "  select * from users"}), &context(store.clone()))
                .await
        );
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert_eq!(store.call_count(), 0);
    }
}
