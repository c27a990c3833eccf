//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered in `domains/tools/registry.rs`. Both the rmcp handler and
//! the HTTP transport list and call tools through that registry, so an
//! unknown tool or a failing one is always answered with an error result.

use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::store::QueryExecutor;
use crate::domains::{
    insights::InsightMemo,
    prompts::{PromptError, PromptService},
    resources::{ResourceError, ResourceService},
    tools::{ToolContext, ToolRegistry},
};

/// Instructions reported to clients on initialize.
pub const SERVER_INSTRUCTIONS: &str = "Você é um agente especialista em palpites de futebol. \
Responda sempre de forma clara, objetiva e contextualizada ao domínio esportivo. \
Utilize as ferramentas registradas para buscar dados quando necessário.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// between different domain services to handle MCP protocol messages.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool handlers and the context they run with.
    registry: Arc<ToolRegistry>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,
}

impl McpServer {
    /// Create a new MCP server over the given store.
    pub fn new(config: Config, store: Arc<dyn QueryExecutor>) -> Self {
        let config = Arc::new(config);
        let memo = Arc::new(InsightMemo::new());

        let context = ToolContext::new(store, memo.clone(), &config.schedule);
        let registry = Arc::new(ToolRegistry::new(context));

        let resource_service = Arc::new(ResourceService::new(memo));
        let prompt_service = Arc::new(PromptService::new());

        Self {
            registry,
            config,
            resource_service,
            prompt_service,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Instructions reported on initialize.
    pub fn instructions(&self) -> &'static str {
        SERVER_INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.get_all_tools()
    }

    /// Call a tool by name. Always produces a result value.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> CallToolResult {
        self.registry.dispatch(name, arguments).await
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resource_service.list_resources().await
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        self.resource_service.read_resource(uri).await
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompt_service.list_prompts().await
    }

    /// Get a prompt by name. Non-string argument values are ignored.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<GetPromptResult, PromptError> {
        self.prompt_service
            .get_prompt(name, arguments.map(string_arguments))
            .await
    }
}

fn string_arguments(map: serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    map.into_iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
        .collect()
}

/// ServerHandler implementation delegating to the domain services.
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.get_all_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Null);
        Ok(self.registry.dispatch(&request.name, arguments).await)
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        self.prompt_service
            .get_prompt(&request.name, request.arguments.map(string_arguments))
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::fake::FakeExecutor;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn server_with(store: FakeExecutor) -> McpServer {
        McpServer::new(Config::default(), Arc::new(store))
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_server_info() {
        let server = server_with(FakeExecutor::new());
        let info = server.get_info();
        assert_eq!(info.instructions.as_deref(), Some(SERVER_INSTRUCTIONS));
        assert_eq!(info.server_info.name, server.name());
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
    }

    #[test]
    fn test_lists_every_tool() {
        let server = server_with(FakeExecutor::new());
        assert_eq!(server.list_tools().len(), 9);
    }

    #[tokio::test]
    async fn test_insight_reaches_the_memo_resource() {
        let server = server_with(FakeExecutor::new());

        let result = server
            .call_tool("append-insight", json!({"insight": "Mandantes vencem mais"}))
            .await;
        assert_eq!(result.is_error, Some(false));

        let read = assert_ok!(server.read_resource("memo://insights").await);
        match &read.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                assert_eq!(text, "• Mandantes vencem mais");
            }
            other => panic!("unexpected contents {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_tool_uses_store() {
        let store = FakeExecutor::new().with_rows(vec![json!({
            "userId": 3,
            "name": "Bia",
            "email": null,
            "totalPoints": 17
        })]);
        let server = server_with(store);

        let result = server
            .call_tool("get-month-top-user", json!({"month": 2, "year": 2025}))
            .await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "Top de 2/2025: Bia com 17 pontos.");
    }

    #[tokio::test]
    async fn test_unknown_resource_and_prompt() {
        let server = server_with(FakeExecutor::new());
        assert_err!(server.read_resource("memo://nothing").await);
        assert_err!(server.get_prompt("nothing", None).await);
    }

    #[tokio::test]
    async fn test_get_prompt_ignores_non_string_arguments() {
        let server = server_with(FakeExecutor::new());

        let mut args = serde_json::Map::new();
        args.insert("topic".to_string(), json!(7));
        assert_err!(server.get_prompt("mcp-demo", Some(args)).await);

        let mut args = serde_json::Map::new();
        args.insert("topic".to_string(), json!("Copa"));
        let result = assert_ok!(server.get_prompt("mcp-demo", Some(args)).await);
        assert_eq!(result.messages.len(), 1);
    }
}
