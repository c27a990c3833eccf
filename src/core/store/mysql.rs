//! MariaDB / MySQL executor built on a sqlx connection pool.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row as _, TypeInfo};
use tracing::{debug, info, warn};

use super::{ExecOutcome, QueryExecutor, QueryParam, Row, StoreError};
use crate::core::config::DatabaseConfig;
use crate::core::time_window::SQL_DATETIME_FORMAT;

/// Query executor backed by a bounded `MySqlPool`.
#[derive(Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Build the pool without opening a connection yet.
    ///
    /// Sessions run in UTC so DATETIME literals compare the same way the
    /// time window computes them.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .timezone(Some(String::from("+00:00")));

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        info!(
            "Database pool configured for {}:{}/{} (max {} connections)",
            config.host, config.port, config.name, config.max_connections
        );

        Self { pool }
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn fetch(&self, sql: &str, params: &[QueryParam]) -> Result<Vec<Row>, StoreError> {
        debug!(params = params.len(), "fetch: {}", sql.trim());
        // The pooled connection goes back to the pool when `conn` drops.
        let mut conn = self.pool.acquire().await?;
        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.iter().map(row_to_map).collect())
    }

    async fn execute(&self, sql: &str, params: &[QueryParam]) -> Result<ExecOutcome, StoreError> {
        debug!(params = params.len(), "execute: {}", sql.trim());
        let mut conn = self.pool.acquire().await?;
        let result = bind_params(sqlx::query(sql), params)
            .execute(&mut *conn)
            .await?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }
}

fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [QueryParam],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            QueryParam::Int(value) => query.bind(*value),
            QueryParam::Text(value) => query.bind(value.as_str()),
        };
    }
    query
}

fn row_to_map(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .map(|column| (column.name().to_string(), decode_column(row, column.ordinal())))
        .collect()
}

/// Decode one column into JSON, trying the Rust types MySQL values map to.
fn decode_column(row: &MySqlRow, index: usize) -> Value {
    if row.column(index).type_info().name() == "DECIMAL" {
        return match row.try_get_unchecked::<Option<String>, _>(index) {
            Ok(value) => value.map_or(Value::Null, decimal_value),
            Err(e) => {
                warn!("Failed to decode DECIMAL column {}: {}", index, e);
                Value::Null
            }
        };
    }

    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map_or(Value::Null, Value::from);
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
        return value.map_or(Value::Null, Value::from);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map_or(Value::Null, Value::from);
    }
    if let Ok(value) = row.try_get::<Option<NaiveDateTime>, _>(index) {
        return value.map_or(Value::Null, |v| {
            Value::String(v.format(SQL_DATETIME_FORMAT).to_string())
        });
    }
    if let Ok(value) = row.try_get::<Option<DateTime<Utc>>, _>(index) {
        return value.map_or(Value::Null, |v| {
            Value::String(v.naive_utc().format(SQL_DATETIME_FORMAT).to_string())
        });
    }
    if let Ok(value) = row.try_get::<Option<NaiveDate>, _>(index) {
        return value.map_or(Value::Null, |v| Value::String(v.format("%Y-%m-%d").to_string()));
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map_or(Value::Null, Value::String);
    }

    match row.try_get_unchecked::<Option<String>, _>(index) {
        Ok(value) => value.map_or(Value::Null, Value::String),
        Err(e) => {
            warn!(
                "Unsupported column type {} at index {}: {}",
                row.column(index).type_info().name(),
                index,
                e
            );
            Value::Null
        }
    }
}

/// DECIMAL arrives as text; keep it numeric when it fits.
fn decimal_value(raw: String) -> Value {
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::from(integer);
    }
    match raw.parse::<f64>() {
        Ok(float) if float.is_finite() => Value::from(float),
        _ => Value::String(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_value() {
        assert_eq!(decimal_value("42".to_string()), Value::from(42));
        assert_eq!(decimal_value("1.5".to_string()), Value::from(1.5));
        assert_eq!(
            decimal_value("not-a-number".to_string()),
            Value::String("not-a-number".to_string())
        );
    }

    fn test_config() -> DatabaseConfig {
        DatabaseConfig::from_env()
    }

    // Integration tests require a reachable MariaDB configured through DB_* variables.
    // Run with: cargo test -- --ignored

    #[ignore = "requires database"]
    #[tokio::test]
    async fn test_fetch_roundtrip() {
        let executor = MySqlExecutor::connect_lazy(&test_config());
        let rows = executor
            .fetch("SELECT ? AS n, ? AS s", &[QueryParam::Int(1), QueryParam::from("x")])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("n"), Some(&Value::from(1)));
        assert_eq!(rows[0].get("s"), Some(&Value::from("x")));
    }

    #[ignore = "requires database"]
    #[tokio::test]
    async fn test_failed_queries_release_connections() {
        let mut config = test_config();
        config.max_connections = 1;
        let executor = MySqlExecutor::connect_lazy(&config);

        for _ in 0..3 {
            assert!(executor.fetch("SELECT * FROM no_such_table", &[]).await.is_err());
        }
        // A leaked connection would make this acquire time out.
        assert!(executor.ping().await.is_ok());
    }
}
