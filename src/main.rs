//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, opens the store pool and starts
//! the server with the configured transport.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use palpite_mcp_server::core::{Config, McpServer, MySqlExecutor, QueryExecutor, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let store = MySqlExecutor::connect_lazy(&config.database);

    // A failed ping is reported but does not stop the server.
    match store.ping().await {
        Ok(()) => info!("Database connection OK"),
        Err(e) => error!("Database connection failed: {}", e),
    }

    let server = McpServer::new(config.clone(), Arc::new(store.clone()));

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    let outcome = transport.run(server).await;

    store.pool().close().await;
    info!("Server shutting down");

    outcome?;
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so stdout stays free for the stdio transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
