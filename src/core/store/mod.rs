//! Relational store access.
//!
//! The rest of the server talks to the database only through the
//! [`QueryExecutor`] trait: a parameterized statement goes in, an ordered
//! list of rows (column name to JSON value) comes out. Connection lifetime
//! is owned by the executor and scoped to a single call.
//!
//! - `mysql.rs` - sqlx-backed executor for MariaDB / MySQL
//! - `error.rs` - store error type

mod error;
mod mysql;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::StoreError;
pub use mysql::MySqlExecutor;

/// A single result row: column name mapped to its decoded value.
pub type Row = serde_json::Map<String, Value>;

/// A positional statement parameter (`?` placeholder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Int(i64),
    Text(String),
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for QueryParam {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Driver-reported metadata for a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: u64,
}

/// Executes statements against the relational store.
///
/// Implementations acquire one pooled connection per call and must hand it
/// back on every path, including failures.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a statement that produces rows.
    async fn fetch(&self, sql: &str, params: &[QueryParam]) -> Result<Vec<Row>, StoreError>;

    /// Run a mutating statement and report affected-row metadata.
    async fn execute(&self, sql: &str, params: &[QueryParam]) -> Result<ExecOutcome, StoreError>;

    /// Check that the store answers at all.
    async fn ping(&self) -> Result<(), StoreError> {
        self.fetch("SELECT 1", &[]).await.map(|_| ())
    }
}

/// Decode raw rows into typed records.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|e| StoreError::decode(e.to_string()))
        })
        .collect()
}

/// Build `?, ?, ?` for an `IN (...)` list of the given length.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
