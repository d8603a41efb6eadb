//! Mock database clients for testing.
//!
//! Provides in-memory implementations of `DatabaseClient` so the report
//! runner can be exercised without a live PostgreSQL server.

use super::{ColumnInfo, DatabaseClient, QueryResult, Value};
use crate::config::ConnectionConfig;
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A mock database client that replays scripted results.
///
/// Results are returned in the order they were queued; once the script is
/// exhausted, every query gets a one-row echo result. Executed SQL is
/// recorded for assertions.
pub struct MockDatabaseClient {
    scripted: Mutex<VecDeque<QueryResult>>,
    executed: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockDatabaseClient {
    /// Creates a new mock client with no scripted results.
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock client that replays the given results in order.
    pub fn with_results(results: Vec<QueryResult>) -> Self {
        Self {
            scripted: Mutex::new(results.into()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the SQL texts executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed
            .lock()
            .expect("mock lock poisoned")
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    /// Returns the parameters bound to each executed query, in order.
    pub fn executed_params(&self) -> Vec<Vec<String>> {
        self.executed
            .lock()
            .expect("mock lock poisoned")
            .iter()
            .map(|(_, params)| params.clone())
            .collect()
    }

    fn echo_result(sql: &str) -> QueryResult {
        let columns = vec![ColumnInfo::new("result", "text")];
        let rows = vec![vec![Value::String(format!("Mock result for: {}", sql.trim()))]];
        QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1))
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn connect(_config: &ConnectionConfig) -> Result<Self> {
        Ok(Self::new())
    }

    async fn execute_query(&self, sql: &str, params: &[&str]) -> Result<QueryResult> {
        self.executed.lock().expect("mock lock poisoned").push((
            sql.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));

        let scripted = self
            .scripted
            .lock()
            .expect("mock lock poisoned")
            .pop_front();

        Ok(scripted.unwrap_or_else(|| Self::echo_result(sql)))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock client that fails on the Nth query (1-based).
///
/// Queries before the failing one succeed with echo results; the failing
/// query returns a query error. Used to verify that a mid-run failure
/// aborts the remaining reports.
pub struct FailingDatabaseClient {
    fail_on: usize,
    calls: AtomicUsize,
}

impl FailingDatabaseClient {
    /// Creates a client that fails on the `fail_on`-th query.
    pub fn failing_on(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns how many queries were attempted, including the failing one.
    pub fn attempted_queries(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn connect(_config: &ConnectionConfig) -> Result<Self> {
        Ok(Self::failing_on(1))
    }

    async fn execute_query(&self, sql: &str, _params: &[&str]) -> Result<QueryResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if call == self.fail_on {
            return Err(ReportError::query(format!(
                "simulated failure on query {call}"
            )));
        }

        Ok(MockDatabaseClient::echo_result(sql))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
