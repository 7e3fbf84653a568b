//! DDL grammar: compiles blueprint commands into DM8 statements.
//!
//! The grammar is a stateless compiler over [`Command`]: every call takes the
//! blueprint plus the command and returns the statements in execution order.
//! Type mapping, identifier quoting and the implicit-default policy come from
//! the composed [`Dialect`].
//!
//! Implied commands (the `add`/`change` pair for altered tables, fluent index
//! flags, the auto-increment primary key) are registered by
//! [`Blueprint::resolve_implied_commands`] before compilation, so
//! [`SchemaGrammar::compile`] never mutates its input.

mod columns;
mod commands;

pub use columns::enum_constraint_name;
pub use commands::{DROP_ALL_TABLES_SQL, TABLE_EXISTS_SQL};

use tracing::debug;

use crate::config::GrammarConfig;
use crate::core::schema::{Blueprint, Command};
use crate::core::traits::Dialect;
use crate::dialect::Dm8Dialect;
use crate::error::Result;

/// Constraint kinds routed through [`SchemaGrammar::drop_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Primary,
    Index,
    Foreign,
}

/// Schema grammar over a dialect.
#[derive(Debug, Clone)]
pub struct SchemaGrammar<D: Dialect = Dm8Dialect> {
    dialect: D,
    schema_prefix: String,
    table_prefix: String,
    strict_mode: bool,
}

/// The DM8 grammar.
pub type Dm8Grammar = SchemaGrammar<Dm8Dialect>;

impl<D: Dialect> SchemaGrammar<D> {
    /// Grammar over `dialect` with no prefixes and strict mode off.
    pub fn with_dialect(dialect: D) -> Self {
        Self {
            dialect,
            schema_prefix: String::new(),
            table_prefix: String::new(),
            strict_mode: false,
        }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn schema_prefix(&self) -> &str {
        &self.schema_prefix
    }

    pub fn set_schema_prefix(&mut self, prefix: impl Into<String>) {
        self.schema_prefix = prefix.into();
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) {
        self.table_prefix = prefix.into();
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn set_strict_mode(&mut self, strict_mode: bool) {
        self.strict_mode = strict_mode;
    }

    /// Table name with the table prefix applied, unquoted.
    pub fn prefixed_table(&self, table: &str) -> String {
        format!("{}{}", self.table_prefix, table)
    }

    /// Quoted table name, qualified with the schema prefix when one is set.
    pub fn wrap_table(&self, table: &str) -> String {
        let wrapped = self.dialect.wrap(&self.prefixed_table(table));
        if self.schema_prefix.is_empty() {
            wrapped
        } else {
            format!("{}.{}", self.schema_prefix, wrapped)
        }
    }

    /// Quote a column or index identifier.
    pub fn wrap(&self, value: &str) -> String {
        self.dialect.wrap(value)
    }

    pub fn columnize(&self, columns: &[String]) -> String {
        self.dialect.columnize(columns)
    }

    /// Compile one command of `blueprint`.
    ///
    /// Returns no statements when the command is folded into another one
    /// (a primary key or foreign key on a created table, an implied or
    /// inlined primary key).
    ///
    /// # Errors
    ///
    /// `UnknownColumn` when the command names a column the blueprint lacks,
    /// or any type-mapping error of the columns it renders.
    pub fn compile(&self, blueprint: &Blueprint, command: &Command) -> Result<Vec<String>> {
        let statements = match command {
            Command::Create => vec![self.compile_create(blueprint)?],
            Command::Add { columns } => self.compile_add(blueprint, columns)?,
            Command::Change { columns } => self.compile_change(blueprint, columns)?,
            Command::Primary(primary) => self.compile_primary(blueprint, primary)?,
            Command::Foreign(foreign) => self.compile_foreign(blueprint, foreign),
            Command::Unique(index) => vec![self.compile_unique(blueprint, index)?],
            Command::Index(index) => vec![self.compile_index(blueprint, index)?],
            Command::Drop => vec![self.compile_drop(blueprint)],
            Command::DropIfExists => vec![self.compile_drop_if_exists(blueprint)],
            Command::DropAllTables => vec![DROP_ALL_TABLES_SQL.to_string()],
            Command::DropColumn { columns } => self.compile_drop_column(blueprint, columns),
            Command::DropPrimary { index } => {
                vec![self.drop_constraint(blueprint, index, ConstraintKind::Primary)]
            }
            Command::DropUnique { index } | Command::DropIndex { index } => {
                vec![self.drop_constraint(blueprint, index, ConstraintKind::Index)]
            }
            Command::DropForeign { index } => {
                vec![self.drop_constraint(blueprint, index, ConstraintKind::Foreign)]
            }
            Command::Rename { to } => vec![self.compile_rename(blueprint, to)],
            Command::RenameColumn { from, to } => {
                vec![self.compile_rename_column(blueprint, from, to)]
            }
            Command::TableComment { comment } => {
                vec![self.compile_table_comment(blueprint, comment)]
            }
            Command::UpdateEnum { column, allowed } => {
                self.compile_update_enum(blueprint, column, allowed)
            }
            Command::TableExists => vec![TABLE_EXISTS_SQL.to_string()],
            Command::ColumnExists { database } => {
                vec![self.compile_column_exists(database, &self.prefixed_table(&blueprint.table))]
            }
        };

        Ok(statements)
    }

    /// Resolve implied commands, then compile every command in order.
    pub fn to_sql(&self, blueprint: &mut Blueprint) -> Result<Vec<String>> {
        blueprint.resolve_implied_commands()?;

        let mut statements = Vec::new();
        for command in &blueprint.commands {
            let compiled = self.compile(blueprint, command)?;
            for sql in &compiled {
                debug!("Compiled {} on {}: {}", command.name(), blueprint.table, sql);
            }
            statements.extend(compiled);
        }
        Ok(statements)
    }
}

impl Dm8Grammar {
    /// DM8 grammar with default configuration.
    pub fn new() -> Self {
        Self::from_config(&GrammarConfig::default())
    }

    pub fn from_config(config: &GrammarConfig) -> Self {
        let mut grammar = Self::with_dialect(Dm8Dialect::new(config.length_in_char));
        grammar.schema_prefix = config.schema_prefix.clone();
        grammar.table_prefix = config.table_prefix.clone();
        grammar.strict_mode = config.strict_mode;
        grammar
    }

    pub fn length_in_char(&self) -> bool {
        self.dialect.length_in_char()
    }

    pub fn set_length_in_char(&mut self, length_in_char: bool) {
        self.dialect.set_length_in_char(length_in_char);
    }
}

impl Default for Dm8Grammar {
    fn default() -> Self {
        Self::new()
    }
}
