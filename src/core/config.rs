//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally via a `.env` file) on top of defaults.

use super::time_window::parse_sql_literal;
use super::transport::TransportConfig;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
///
/// Organized by concern; every section has working defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Relational store connection settings.
    pub database: DatabaseConfig,

    /// Time zone and cutoff settings for fixture filters.
    pub schedule: ScheduleConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Connection settings for the MariaDB store.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database (schema) name.
    pub name: String,
    /// Pool capacity. Callers beyond it wait for a free connection.
    pub max_connections: u32,
    /// How long a caller may wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

/// Local-time settings for "today/upcoming/finished" filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Fixed offset of the deployment's local time from UTC, in hours.
    pub utc_offset_hours: i32,

    /// Fixed cutoff for finished games. When unset, the end of the current
    /// local day is used.
    pub finished_cutoff: Option<NaiveDateTime>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "palpitefc".to_string(),
            max_connections: 6,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    /// Load database settings from `DB_*` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("DB_HOST") {
            config.host = host;
        }
        config.port = env_parse("DB_PORT", config.port);
        if let Ok(user) = std::env::var("DB_USER") {
            config.user = user;
        }
        if let Ok(password) = std::env::var("DB_PASSWORD") {
            config.password = password;
        }
        if let Ok(name) = std::env::var("DB_NAME") {
            config.name = name;
        }
        config.max_connections = env_parse("DB_POOL_SIZE", config.max_connections).max(1);
        config.acquire_timeout_secs = env_parse("DB_ACQUIRE_TIMEOUT_SECS", config.acquire_timeout_secs);

        config
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            // Brasília time
            utc_offset_hours: -3,
            finished_cutoff: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "palpitefc-mariadb".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            database: DatabaseConfig::default(),
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Database settings use the deployment's `DB_*` names; server settings
    /// are prefixed with `MCP_`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.database = DatabaseConfig::from_env();

        config.schedule.utc_offset_hours =
            env_parse("MCP_UTC_OFFSET_HOURS", config.schedule.utc_offset_hours);

        if let Ok(cutoff) = std::env::var("MCP_FINISHED_CUTOFF") {
            match parse_sql_literal(&cutoff) {
                Some(value) => {
                    info!("Finished games cutoff fixed at {}", value);
                    config.schedule.finished_cutoff = Some(value);
                }
                None => warn!(
                    "Ignoring MCP_FINISHED_CUTOFF={:?}: expected YYYY-MM-DD HH:MM:SS",
                    cutoff
                ),
            }
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }
}

/// Parse an environment variable, keeping the default when absent or invalid.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_database_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DB_HOST", "db.internal");
            std::env::set_var("DB_PORT", "3307");
            std::env::set_var("DB_POOL_SIZE", "0");
        }
        let config = DatabaseConfig::from_env();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 3307);
        assert_eq!(config.max_connections, 1);
        unsafe {
            std::env::remove_var("DB_HOST");
            std::env::remove_var("DB_PORT");
            std::env::remove_var("DB_POOL_SIZE");
        }
    }

    #[test]
    fn test_invalid_port_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DB_PORT", "not-a-port");
        }
        let config = DatabaseConfig::from_env();
        assert_eq!(config.port, 3306);
        unsafe {
            std::env::remove_var("DB_PORT");
        }
    }

    #[test]
    fn test_finished_cutoff_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_FINISHED_CUTOFF", "2025-12-02 08:59:00");
        }
        let config = Config::from_env();
        assert_eq!(
            config.schedule.finished_cutoff,
            parse_sql_literal("2025-12-02 08:59:00")
        );
        unsafe {
            std::env::set_var("MCP_FINISHED_CUTOFF", "yesterday");
        }
        let config = Config::from_env();
        assert!(config.schedule.finished_cutoff.is_none());
        unsafe {
            std::env::remove_var("MCP_FINISHED_CUTOFF");
        }
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let config = DatabaseConfig {
            password: "super_secret_pw".to_string(),
            ..DatabaseConfig::default()
        };
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_pw"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.database.max_connections, 6);
        assert_eq!(config.schedule.utc_offset_hours, -3);
        assert!(config.schedule.finished_cutoff.is_none());
    }
}
