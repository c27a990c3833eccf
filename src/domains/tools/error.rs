//! Tool-specific error types.

use thiserror::Error;

use crate::core::store::StoreError;

/// Errors that can occur while dispatching or running a tool.
///
/// None of these escape the registry: [`super::ToolRegistry::dispatch`]
/// turns every variant into an error result for the caller.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments violate the tool's declared schema or policy.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The store rejected a statement. The driver message is logged only.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller may see this error's own message.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::InvalidArguments(_))
    }
}
