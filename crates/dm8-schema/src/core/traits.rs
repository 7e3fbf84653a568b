//! Core traits at the seams of the schema layer.
//!
//! - [`Connection`]: executes compiled SQL and runs catalog queries
//! - [`Dialect`]: Oracle-family syntax hooks the grammar composes with
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` provides the interchangeable type mapping,
//!   identifier quoting and default policy
//! - **Template Method**: default `Dialect` methods define the shared
//!   Oracle-family rules; a dialect overrides only what differs

use async_trait::async_trait;

use crate::error::Result;

use super::schema::{ColumnSpec, ColumnType, DefaultValue};
use super::value::Row;

/// The collaborator that talks to the database.
///
/// Implementations own transport, pooling and transactions; the schema layer
/// only hands them SQL text. Failures must be surfaced as
/// [`SchemaError::Database`](crate::error::SchemaError::Database) carrying the
/// driver's message unchanged.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute a statement, returning the affected row count.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Run a query with positional `?` parameters.
    async fn select(&self, sql: &str, params: &[String]) -> Result<Vec<Row>>;
}

/// Oracle-family SQL syntax hooks.
///
/// The grammar never hard-codes type names or quoting; it asks its dialect.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "dm8").
    fn name(&self) -> &str;

    /// Quote a single identifier segment.
    fn quote_ident(&self, name: &str) -> String;

    /// Quote a possibly dotted identifier (`schema.table`) segment by segment.
    fn wrap(&self, value: &str) -> String {
        value
            .split('.')
            .map(|segment| self.quote_ident(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wrap each name and join with `, `.
    fn columnize(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.wrap(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Map an abstract column spec to the dialect's column type syntax.
    fn map_type(&self, column: &ColumnSpec) -> Result<String>;

    /// Default to inject for a NOT NULL column without one, keyed by the
    /// already-mapped type string. `None` leaves the column without a default.
    fn implicit_default(&self, type_sql: &str) -> Option<DefaultValue>;

    /// Types that accept the auto-increment modifier.
    fn is_serial(&self, column_type: ColumnType) -> bool {
        column_type.is_serial()
    }

    /// Keyword emitted for auto-increment columns.
    fn auto_increment_keyword(&self) -> &str {
        "auto_increment"
    }

    /// Render a default value literal.
    fn default_literal(&self, value: &DefaultValue) -> String {
        value.to_sql_literal()
    }
}
