//! In-memory [`Connection`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::traits::Connection;
use crate::core::value::Row;
use crate::error::{Result, SchemaError};

/// Records every statement and serves queued result sets in order.
#[derive(Default)]
pub struct MockConnection {
    executed: Mutex<Vec<String>>,
    queries: Mutex<Vec<(String, Vec<String>)>>,
    results: Mutex<VecDeque<Vec<Row>>>,
    fail_on: Option<String>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next `select`.
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.results.lock().unwrap().push_back(rows);
        self
    }

    /// Reject any statement containing `fragment`.
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<(String, Vec<String>)> {
        self.queries.lock().unwrap().clone()
    }

    fn check(&self, sql: &str) -> Result<()> {
        match &self.fail_on {
            Some(fragment) if sql.contains(fragment.as_str()) => Err(SchemaError::database(
                "-2124: duplicate object name",
                sql,
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(&self, sql: &str) -> Result<u64> {
        self.check(sql)?;
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(0)
    }

    async fn select(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        self.check(sql)?;
        self.queries
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }
}
