//! Schema builder: compiles blueprints and runs them on a connection.

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::identifier::validate_identifier;
use crate::core::schema::Blueprint;
use crate::core::traits::Connection;
use crate::error::Result;
use crate::grammar::{Dm8Grammar, TABLE_EXISTS_SQL};

/// Runs blueprints against a DM8 connection.
pub struct SchemaBuilder {
    connection: Arc<dyn Connection>,
    grammar: Dm8Grammar,
    owner: String,
}

impl SchemaBuilder {
    /// `owner` is the catalog owner the existence checks filter on.
    pub fn new(connection: Arc<dyn Connection>, grammar: Dm8Grammar, owner: impl Into<String>) -> Self {
        Self {
            connection,
            grammar,
            owner: owner.into(),
        }
    }

    pub fn grammar(&self) -> &Dm8Grammar {
        &self.grammar
    }

    pub fn grammar_mut(&mut self) -> &mut Dm8Grammar {
        &mut self.grammar
    }

    fn blueprint(&self, table: &str) -> Result<Blueprint> {
        validate_identifier(table)?;
        Ok(Blueprint::new(table).with_prefix(self.grammar.table_prefix()))
    }

    /// Compile `blueprint` and execute its statements in order.
    ///
    /// Stops at the first statement the database rejects and returns that
    /// error unchanged.
    pub async fn build(&self, mut blueprint: Blueprint) -> Result<Vec<String>> {
        validate_identifier(&blueprint.table)?;
        let statements = self.grammar.to_sql(&mut blueprint)?;

        for sql in &statements {
            debug!("Executing: {}", sql);
            self.connection.execute(sql).await?;
        }

        info!(
            "Applied {} statement(s) to {}",
            statements.len(),
            blueprint.table
        );
        Ok(statements)
    }

    /// Create a table.
    pub async fn create<F>(&self, table: &str, define: F) -> Result<Vec<String>>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = self.blueprint(table)?;
        blueprint.create();
        define(&mut blueprint);
        self.build(blueprint).await
    }

    /// Modify an existing table.
    pub async fn table<F>(&self, table: &str, define: F) -> Result<Vec<String>>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = self.blueprint(table)?;
        define(&mut blueprint);
        self.build(blueprint).await
    }

    pub async fn drop(&self, table: &str) -> Result<Vec<String>> {
        let mut blueprint = self.blueprint(table)?;
        blueprint.drop();
        self.build(blueprint).await
    }

    pub async fn drop_if_exists(&self, table: &str) -> Result<Vec<String>> {
        let mut blueprint = self.blueprint(table)?;
        blueprint.drop_if_exists();
        self.build(blueprint).await
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<Vec<String>> {
        validate_identifier(to)?;
        let mut blueprint = self.blueprint(from)?;
        blueprint.rename(to);
        self.build(blueprint).await
    }

    /// Drop every table and sequence of the connected user.
    pub async fn drop_all_tables(&self) -> Result<()> {
        let sql = crate::grammar::DROP_ALL_TABLES_SQL;
        self.connection.execute(sql).await?;
        info!("Dropped all tables and sequences");
        Ok(())
    }

    pub async fn has_table(&self, table: &str) -> Result<bool> {
        validate_identifier(table)?;
        let params = [self.owner.clone(), self.grammar.prefixed_table(table)];
        let rows = self.connection.select(TABLE_EXISTS_SQL, &params).await?;
        Ok(!rows.is_empty())
    }

    pub async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.has_columns(table, &[column]).await
    }

    /// Whether every name in `columns` exists on `table` (case-insensitive).
    pub async fn has_columns(&self, table: &str, columns: &[&str]) -> Result<bool> {
        let existing = self.column_listing(table).await?;
        Ok(columns
            .iter()
            .all(|c| existing.iter().any(|e| e.eq_ignore_ascii_case(c))))
    }

    /// Column names of `table` as stored in the catalog.
    pub async fn column_listing(&self, table: &str) -> Result<Vec<String>> {
        validate_identifier(table)?;
        let sql = self
            .grammar
            .compile_column_exists(&self.owner, &self.grammar.prefixed_table(table));
        let rows = self.connection.select(&sql, &[]).await?;
        Ok(rows.iter().filter_map(|r| r.text("COLUMN_NAME")).collect())
    }
}
