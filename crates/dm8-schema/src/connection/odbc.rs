//! DM8 connection over the vendor ODBC driver.
//!
//! **Requirements:**
//! - The `odbc` feature must be enabled
//! - The DM8 ODBC driver must be installed and registered with the driver
//!   manager (unixODBC on Linux) under the configured driver name

use std::sync::Arc;

use async_trait::async_trait;
use odbc_api::{
    buffers::TextRowSet, ConnectionOptions, Cursor, Environment, IntoParameter, ResultSetMetadata,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::core::traits::Connection;
use crate::core::value::{Row, SqlValue};
use crate::error::{Result, SchemaError};

const PING_SQL: &str = "SELECT 1 FROM DUAL";

/// Rows fetched per round trip.
const BATCH_SIZE: usize = 500;

/// Upper bound for a single text value (catalog defaults can be long).
const MAX_TEXT_LEN: usize = 8192;

pub struct OdbcConnection {
    env: Arc<Environment>,
    connection_string: String,
    /// Serializes ODBC calls; handles are not shared between threads.
    lock: Mutex<()>,
}

impl OdbcConnection {
    /// Open the ODBC environment and verify that the server is reachable.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let env = Environment::new().map_err(|e| {
            SchemaError::Config(format!(
                "Failed to create ODBC environment: {}. Make sure the DM8 ODBC driver is installed.",
                e
            ))
        })?;
        let connection_string = config.connection_string();

        debug!(
            "ODBC connection string (credentials hidden): Driver={{{}}};Server={};UID={};...",
            config.odbc_driver,
            if config.tns.is_empty() { &config.host } else { &config.tns },
            config.username
        );

        {
            let conn = env
                .connect_with_connection_string(&connection_string, ConnectionOptions::default())
                .map_err(|e| {
                    SchemaError::database(format!("Failed to connect to DM8 via ODBC: {}", e), "")
                })?;
            conn.execute(PING_SQL, ())
                .map_err(|e| SchemaError::database(e.to_string(), PING_SQL))?;
        }

        info!(
            "Connected to DM8 via ODBC: {}:{} as {}",
            config.host, config.port, config.username
        );

        Ok(Self {
            env: Arc::new(env),
            connection_string,
            lock: Mutex::new(()),
        })
    }

    fn open(&self) -> Result<odbc_api::Connection<'_>> {
        self.env
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(|e| SchemaError::database(format!("ODBC connection failed: {}", e), ""))
    }

    fn query(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        let conn = self.open()?;
        let params: Vec<_> = params.iter().map(|p| p.as_str().into_parameter()).collect();
        let fail = |e: odbc_api::Error| SchemaError::database(e.to_string(), sql);

        let mut rows = Vec::new();
        let Some(mut cursor) = conn.execute(sql, params.as_slice()).map_err(fail)? else {
            return Ok(rows);
        };

        let num_cols = cursor.num_result_cols().map_err(fail)? as u16;
        let mut names = Vec::with_capacity(num_cols as usize);
        for i in 1..=num_cols {
            names.push(cursor.col_name(i).map_err(fail)?);
        }

        let mut buffers =
            TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LEN)).map_err(fail)?;
        let mut row_cursor = cursor.bind_buffer(&mut buffers).map_err(fail)?;

        while let Some(batch) = row_cursor.fetch().map_err(fail)? {
            for row_idx in 0..batch.num_rows() {
                let row: Row = names
                    .iter()
                    .enumerate()
                    .map(|(col_idx, name)| {
                        let value = batch
                            .at(col_idx, row_idx)
                            .map(|bytes| String::from_utf8_lossy(bytes).to_string());
                        (name.as_str(), SqlValue::from(value))
                    })
                    .collect();
                rows.push(row);
            }
        }

        Ok(rows)
    }

    fn run(&self, sql: &str) -> Result<u64> {
        let conn = self.open()?;
        let fail = |e: odbc_api::Error| SchemaError::database(e.to_string(), sql);

        let mut prepared = conn.prepare(sql).map_err(fail)?;
        prepared.execute(()).map_err(fail)?;
        let affected = prepared.row_count().map_err(fail)?.unwrap_or(0);
        Ok(affected as u64)
    }
}

#[async_trait]
impl Connection for OdbcConnection {
    async fn execute(&self, sql: &str) -> Result<u64> {
        let _guard = self.lock.lock().await;
        debug!("Executing: {}", sql);
        self.run(sql)
    }

    async fn select(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        let _guard = self.lock.lock().await;
        let rows = self.query(sql, params)?;
        debug!("Query returned {} rows", rows.len());
        Ok(rows)
    }
}
