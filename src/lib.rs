//! Palpite MCP Server Library
//!
//! A Model Context Protocol (MCP) server that answers questions about a
//! football-guess ("palpites") competition stored in MariaDB.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the store adapter, the local
//!   time window, the server handler and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: ranking, fixture, memo and SQL tools
//!   - **resources**: the `memo://insights` resource
//!   - **prompts**: the `mcp-demo` prompt
//!   - **insights**, **stats**, **models**: shared state and pure helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use palpite_mcp_server::core::{Config, McpServer, MySqlExecutor, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let store = MySqlExecutor::connect_lazy(&config.database);
//!     let server = McpServer::new(config.clone(), Arc::new(store));
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
