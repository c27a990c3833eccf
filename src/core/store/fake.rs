//! In-memory executor for tests: replays canned responses and records calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ExecOutcome, QueryExecutor, QueryParam, Row, StoreError};

enum Response {
    Rows(Vec<Row>),
    Outcome(ExecOutcome),
    Failure(String),
}

/// A statement the fake received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

/// Fake store. Responses are consumed in order; once exhausted every
/// fetch returns no rows.
#[derive(Default)]
pub struct FakeExecutor {
    responses: Mutex<VecDeque<Response>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a row set; each value must be a JSON object.
    pub fn with_rows(self, rows: Vec<Value>) -> Self {
        let rows = rows.into_iter().map(row).collect();
        self.responses.lock().unwrap().push_back(Response::Rows(rows));
        self
    }

    pub fn with_outcome(self, outcome: ExecOutcome) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::Outcome(outcome));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::Failure(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, sql: &str, params: &[QueryParam]) -> Option<Response> {
        self.calls.lock().unwrap().push(RecordedCall {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.responses.lock().unwrap().pop_front()
    }
}

/// Turn a JSON object literal into a row.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be a JSON object, got {other}"),
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn fetch(&self, sql: &str, params: &[QueryParam]) -> Result<Vec<Row>, StoreError> {
        match self.record(sql, params) {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Outcome(_)) | None => Ok(Vec::new()),
            Some(Response::Failure(message)) => Err(StoreError::Database(sqlx::Error::Protocol(message))),
        }
    }

    async fn execute(&self, sql: &str, params: &[QueryParam]) -> Result<ExecOutcome, StoreError> {
        match self.record(sql, params) {
            Some(Response::Outcome(outcome)) => Ok(outcome),
            Some(Response::Rows(_)) | None => Ok(ExecOutcome::default()),
            Some(Response::Failure(message)) => Err(StoreError::Database(sqlx::Error::Protocol(message))),
        }
    }
}
