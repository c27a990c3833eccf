//! Read query tool definition.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::guard::ensure_read;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{rows_json, structured_result};
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

/// Parameters shared by the raw statement tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// A single SQL statement.
    #[schemars(length(min = 1))]
    pub query: String,
}

/// Read query tool - runs one read-only statement.
pub struct ReadQueryTool;

impl ReadQueryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "read-query";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Executa uma consulta de leitura (SELECT, SHOW, DESCRIBE, EXPLAIN, WITH) no banco.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<QueryParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for ReadQueryTool {
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
        "Erro ao executar consulta."
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: QueryParams = parse_arguments(arguments)?;
        ensure_read(&params.query)?;

        let rows = ctx.store.fetch(&params.query, &[]).await?;
        info!("Read query returned {} rows", rows.len());

        let text = rows_json(&rows);
        Ok(structured_result(
            text,
            &json!({ "count": rows.len(), "rows": rows }),
        ))
    }
}
