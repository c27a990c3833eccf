//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is filled once at startup and only read afterwards, so it is
//! shared behind an `Arc` without locking. Both transports dispatch through
//! [`ToolRegistry::dispatch`].

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::definitions::{
    AppendInsightTool, DescribeTableTool, FinishedGamesStatsTool, GameGuessesTool, ListTablesTool,
    MonthTopUserTool, NextFixturesTool, ReadQueryTool, WriteQueryTool,
};
use super::error::ToolError;
use super::format::error_result;
use super::handlers::{DEFAULT_FAILURE_MESSAGE, ToolContext, ToolHandler};

/// Tool registry - owns every tool handler and the context they run with.
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn ToolHandler>>,
    context: ToolContext,
}

impl ToolRegistry {
    /// Create a registry with every tool of the server.
    pub fn new(context: ToolContext) -> Self {
        let mut registry = Self::empty(context);

        registry.register(MonthTopUserTool);
        registry.register(GameGuessesTool);
        registry.register(NextFixturesTool);
        registry.register(FinishedGamesStatsTool);
        registry.register(AppendInsightTool);
        registry.register(ReadQueryTool);
        registry.register(WriteQueryTool);
        registry.register(ListTablesTool);
        registry.register(DescribeTableTool);

        info!("Registered {} tools", registry.tools.len());
        registry
    }

    fn empty(context: ToolContext) -> Self {
        Self {
            tools: BTreeMap::new(),
            context,
        }
    }

    fn register(&mut self, handler: impl ToolHandler + 'static) {
        let name = handler.name();
        if self.tools.insert(name, Arc::new(handler)).is_some() {
            warn!("Tool registered twice, keeping the last one: {}", name);
        }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.tools.values().map(|handler| handler.tool()).collect()
    }

    /// Validate and run a tool, surfacing the error to the caller.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn try_dispatch(&self, name: &str, arguments: Value) -> Result<CallToolResult, ToolError> {
        let handler = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::unknown_tool(name))?;

        handler.schema().validate(&arguments)?;

        match AssertUnwindSafe(handler.execute(arguments, &self.context))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ToolError::internal(format!("tool '{}' panicked", name))),
        }
    }

    /// Run a tool and always produce a result value.
    ///
    /// Caller errors (unknown tool, invalid arguments) keep their message.
    /// Store and internal failures are logged and replaced by the tool's
    /// failure sentence.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> CallToolResult {
        match self.try_dispatch(name, arguments).await {
            Ok(result) => result,
            Err(err) if err.is_caller_error() => {
                warn!(tool = %name, "Rejected tool call: {}", err);
                error_result(err.to_string())
            }
            Err(err) => {
                error!(tool = %name, "Tool call failed: {}", err);
                let message = self
                    .tools
                    .get(name)
                    .map(|handler| handler.failure_message())
                    .unwrap_or(DEFAULT_FAILURE_MESSAGE);
                error_result(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScheduleConfig;
    use crate::core::store::fake::FakeExecutor;
    use crate::domains::insights::InsightMemo;
    use crate::domains::tools::handlers::{NoParams, tool_model};
    use serde_json::json;
    use tokio_test::assert_err;

    fn registry_with(store: Arc<FakeExecutor>) -> ToolRegistry {
        let context = ToolContext::new(store, Arc::new(InsightMemo::new()), &ScheduleConfig::default());
        ToolRegistry::new(context)
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    struct PanickingTool;

    #[async_trait::async_trait]
    impl ToolHandler for PanickingTool {
        fn name(&self) -> &'static str {
            "boom"
        }

        fn tool(&self) -> Tool {
            tool_model::<NoParams>("boom", "panics")
        }

        async fn execute(&self, _arguments: Value, _ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
            panic!("handler bug");
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = registry_with(Arc::new(FakeExecutor::new()));
        let names = registry.tool_names();
        assert_eq!(names.len(), 9);
        for name in [
            "get-month-top-user",
            "get-game-guesses",
            "get-today-next-fixtures",
            "get-finished-games-stats",
            "append-insight",
            "read-query",
            "write-query",
            "list-tables",
            "describe-table",
        ] {
            assert!(names.contains(&name), "missing {}", name);
        }
        assert_eq!(registry.get_all_tools().len(), 9);
    }

    #[test]
    fn test_tools_advertise_bounded_input_schemas() {
        let registry = registry_with(Arc::new(FakeExecutor::new()));
        let tools = registry.get_all_tools();

        let top_user = tools
            .iter()
            .find(|t| t.name == "get-month-top-user")
            .unwrap();
        let properties = top_user.input_schema.get("properties").unwrap();
        assert_eq!(properties["month"]["minimum"], 1);
        assert_eq!(properties["month"]["maximum"], 12);
        assert_eq!(properties["year"]["minimum"], 1970);
        assert_eq!(properties["year"]["maximum"], 9999);

        let finished = tools
            .iter()
            .find(|t| t.name == "get-finished-games-stats")
            .unwrap();
        let properties = finished.input_schema.get("properties").unwrap();
        assert_eq!(properties["limit"]["minimum"], 1);
        assert_eq!(properties["limit"]["maximum"], 10);
    }

    #[tokio::test]
    async fn test_unknown_tool_does_not_touch_store() {
        let store = Arc::new(FakeExecutor::new());
        let registry = registry_with(store.clone());

        let err = assert_err!(registry.try_dispatch("no-such-tool", json!({})).await);
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "no-such-tool"));

        let result = registry.dispatch("no-such-tool", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Unknown tool: no-such-tool");
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_month_rejected_before_query() {
        let store = Arc::new(FakeExecutor::new());
        let registry = registry_with(store.clone());

        let err = assert_err!(
            registry
                .try_dispatch("get-month-top-user", json!({"month": 13}))
                .await
        );
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_team_name_rejected_before_query() {
        let store = Arc::new(FakeExecutor::new());
        let registry = registry_with(store.clone());

        let result = registry
            .dispatch("get-game-guesses", json!({"teamName": "   "}))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Invalid arguments: 'teamName'"));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_becomes_domain_message() {
        let store = Arc::new(FakeExecutor::new().with_failure("connection refused by 10.0.0.5"));
        let registry = registry_with(store.clone());

        let result = registry.dispatch("get-month-top-user", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        let text = text_of(&result);
        assert_eq!(text, "Erro ao consultar ranking.");
        assert!(!text.contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let mut registry = registry_with(Arc::new(FakeExecutor::new()));
        registry.register(PanickingTool);

        let result = registry.dispatch("boom", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), DEFAULT_FAILURE_MESSAGE);

        // The registry keeps serving other calls.
        let result = registry.dispatch("append-insight", json!({"insight": "ok"})).await;
        assert_eq!(result.is_error, Some(false));
    }
}
