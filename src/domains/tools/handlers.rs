//! Tool handler contract.
//!
//! Every tool in `definitions/` implements [`ToolHandler`]. The registry
//! owns the handlers and the shared [`ToolContext`] they run against.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;
use super::schema::ArgSchema;
use crate::core::config::ScheduleConfig;
use crate::core::store::QueryExecutor;
use crate::core::time_window::TimeWindow;
use crate::domains::insights::InsightMemo;

/// Failure sentence used when a tool does not declare its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Erro ao executar a ferramenta.";

/// Everything a handler may touch while running.
#[derive(Clone)]
pub struct ToolContext {
    pub store: Arc<dyn QueryExecutor>,
    pub clock: TimeWindow,
    pub memo: Arc<InsightMemo>,
    /// Fixed upper bound for finished fixtures; `None` means end of local day.
    pub finished_cutoff: Option<NaiveDateTime>,
}

impl ToolContext {
    pub fn new(store: Arc<dyn QueryExecutor>, memo: Arc<InsightMemo>, schedule: &ScheduleConfig) -> Self {
        Self {
            store,
            clock: TimeWindow::new(schedule.utc_offset_hours),
            memo,
            finished_cutoff: schedule.finished_cutoff,
        }
    }
}

/// A named, schema-validated tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &'static str;

    /// MCP tool model (name, description, JSON input schema).
    fn tool(&self) -> Tool;

    /// Declared argument constraints checked before `execute`.
    fn schema(&self) -> ArgSchema {
        ArgSchema::empty()
    }

    /// Sentence shown to the caller when the store fails.
    fn failure_message(&self) -> &'static str {
        DEFAULT_FAILURE_MESSAGE
    }

    /// Run the tool with arguments that already passed `schema()`.
    async fn execute(&self, arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError>;
}

/// Deserialize validated arguments into the tool's params struct.
pub fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Build the MCP tool model for a params type.
pub fn tool_model<P: JsonSchema + 'static>(name: &'static str, description: &'static str) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Params for tools that take no arguments.
#[derive(Debug, Clone, Default, serde::Deserialize, JsonSchema)]
pub struct NoParams {}
