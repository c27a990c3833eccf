//! Prompt definitions module.
//!
//! Each prompt is defined in its own file with its metadata, arguments and
//! template string.

pub mod mcp_demo;

pub use mcp_demo::McpDemoPrompt;

use rmcp::model::PromptArgument;

/// Trait for prompt definitions.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;
}
