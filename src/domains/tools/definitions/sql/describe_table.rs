//! Describe table tool definition.

use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::guard::ensure_identifier;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{rows_json, structured_result};
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

/// Parameters for the describe table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableParams {
    /// Table name (letters, digits and underscores only).
    #[schemars(length(min = 1), regex(pattern = r"^[A-Za-z0-9_]+$"))]
    pub table: String,
}

/// Describe table tool - column layout of one table.
pub struct DescribeTableTool;

impl DescribeTableTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "describe-table";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Mostra o schema de uma tabela.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<DescribeTableParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for DescribeTableTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::empty().required("table", FieldKind::Text { min_len: 1 })
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao descrever tabela."
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: DescribeTableParams = parse_arguments(arguments)?;
        ensure_identifier(&params.table)?;

        // Identifiers cannot be bound as parameters.
        let sql = format!("DESCRIBE `{}`", params.table);
        let rows = ctx.store.fetch(&sql, &[]).await?;
        info!("Table {} has {} columns", params.table, rows.len());

        Ok(structured_result(
            rows_json(&rows),
            &json!({ "table": params.table, "columns": rows }),
        ))
    }
}
