//! Tools domain module.
//!
//! Tools are the callable operations of the server. Each one declares a
//! name, a description, an argument schema and an async handler.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Declared argument constraints checked before a handler runs
//! - `handlers.rs` - The `ToolHandler` trait and the context handlers run with
//! - `registry.rs` - Central tool registry and dispatch
//! - `format.rs` - Text and structured result rendering
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing `ToolHandler`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `ToolRegistry::new`
//!
//! Both transports pick it up from the registry.

pub mod definitions;
mod error;
pub mod format;
mod handlers;
mod registry;
pub mod schema;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
