//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, store access, the local-time
//! window, server lifecycle management and transport layer abstractions.

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod time_window;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use store::{MySqlExecutor, QueryExecutor};
pub use transport::{TransportConfig, TransportService};
