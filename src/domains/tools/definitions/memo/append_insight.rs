//! Append insight tool definition.

use rmcp::model::{CallToolResult, Content, ResourceContents, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::insights::INSIGHTS_URI;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolContext, ToolHandler, parse_arguments, tool_model};
use crate::domains::tools::schema::{ArgSchema, FieldKind};

/// Parameters for the append insight tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AppendInsightParams {
    /// Free-text business insight to remember.
    #[schemars(length(min = 1))]
    pub insight: String,
}

/// Append insight tool - adds one entry to the in-process memo.
pub struct AppendInsightTool;

impl AppendInsightTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "append-insight";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Adiciona insight ao memo (memo://insights).";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_model::<AppendInsightParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for AppendInsightTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    fn schema(&self) -> ArgSchema {
        ArgSchema::empty().required("insight", FieldKind::Text { min_len: 1 })
    }

    #[instrument(skip_all)]
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: AppendInsightParams = parse_arguments(arguments)?;

        let count = ctx.memo.append(params.insight).await;
        info!("Insight appended ({} in memo)", count);

        let memo = ctx.memo.render().await;
        Ok(CallToolResult::success(vec![
            Content::text("Insight added."),
            Content::resource(ResourceContents::text(memo, INSIGHTS_URI)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScheduleConfig;
    use crate::core::store::fake::FakeExecutor;
    use crate::domains::insights::InsightMemo;
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_append_acknowledges_and_embeds_memo() {
        let store = Arc::new(FakeExecutor::new());
        let memo = Arc::new(InsightMemo::new());
        let ctx = ToolContext::new(store.clone(), memo.clone(), &ScheduleConfig::default());

        AppendInsightTool
            .execute(json!({"insight": "x"}), &ctx)
            .await
            .unwrap();
        let result = AppendInsightTool
            .execute(json!({"insight": "y"}), &ctx)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            result.content[0].as_text().map(|t| t.text.as_str()),
            Some("Insight added.")
        );
        match &result.content[1].raw {
            RawContent::Resource(embedded) => match &embedded.resource {
                ResourceContents::TextResourceContents { uri, text, .. } => {
                    assert_eq!(uri, INSIGHTS_URI);
                    assert_eq!(text, "• x\n• y");
                }
                other => panic!("unexpected resource {:?}", other),
            },
            other => panic!("unexpected content {:?}", other),
        }

        assert_eq!(memo.render().await, "• x\n• y");
        assert_eq!(store.call_count(), 0);
    }
}
