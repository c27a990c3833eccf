//! MCP demo prompt definition.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

/// Opens a guided demo of the server's tools around a topic.
pub struct McpDemoPrompt;

impl PromptDefinition for McpDemoPrompt {
    const NAME: &'static str = "mcp-demo";
    const DESCRIPTION: &'static str = "Demonstração MariaDB MCP";

    fn template() -> &'static str {
        "Você iniciou uma demo MCP com o tema: {{topic}}\n\n\
         Vamos explorar ferramentas, recursos e executar queries no seu MariaDB!"
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![PromptArgument {
            name: "topic".to_string(),
            title: None,
            description: Some("Assunto do cenário".to_string()),
            required: Some(true),
        }]
    }
}
