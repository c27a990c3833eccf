//! Store-specific error types.

use thiserror::Error;

/// Errors raised while talking to the relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The driver rejected the statement or the connection failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row did not have the shape the caller expected.
    #[error("Row decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Create a new "decode" error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
