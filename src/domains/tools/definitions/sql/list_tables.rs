//! List tables tool definition.

use rmcp::model::{CallToolResult, Tool};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::format::{rows_json, structured_result};
use crate::domains::tools::handlers::{NoParams, ToolContext, ToolHandler, tool_model};

/// List tables tool - `SHOW TABLES` on the configured database.
pub struct ListTablesTool;

impl ListTablesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list-tables";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Lista as tabelas disponíveis no banco MariaDB.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<NoParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for ListTablesTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn failure_message(&self) -> &'static str {
        "Erro ao listar tabelas."
    }

    #[instrument(skip_all)]
    async fn execute(&self, _arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let rows = ctx.store.fetch("SHOW TABLES", &[]).await?;
        info!("Found {} tables", rows.len());

        Ok(structured_result(
            rows_json(&rows),
            &json!({ "count": rows.len(), "rows": rows }),
        ))
    }
}
