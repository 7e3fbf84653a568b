//! # dm8-schema
//!
//! Schema grammar and catalog introspection for the DM8 (Dameng) database.
//!
//! This library provides:
//!
//! - **Blueprints** describing a table's columns and structural commands
//! - **A DDL grammar** compiling blueprints into DM8's Oracle-compatible SQL
//! - **Catalog introspection** over `ALL_TAB_COLUMNS` / `ALL_INDEXES`
//! - **A schema builder** running compiled statements on a connection
//!
//! ## Example
//!
//! ```rust
//! use dm8_schema::{Blueprint, Dm8Grammar};
//!
//! let mut users = Blueprint::new("users");
//! users.create();
//! users.id();
//! users.string("email", 100).not_null().unique();
//!
//! let grammar = Dm8Grammar::new();
//! for sql in grammar.to_sql(&mut users).unwrap() {
//!     println!("{};", sql);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod connection;
pub mod core;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod introspect;
pub mod platform;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use builder::SchemaBuilder;
pub use config::{Config, ConnectionConfig, GrammarConfig};
pub use crate::core::{
    Blueprint, ColumnSpec, ColumnType, Command, Connection, DefaultValue, Dialect,
    ForeignKeyCommand, IndexCommand, Row, SqlValue,
};
pub use dialect::Dm8Dialect;
pub use error::{Result, SchemaError};
pub use grammar::{ConstraintKind, Dm8Grammar, SchemaGrammar};
pub use introspect::{ColumnInfo, IndexInfo, SchemaManager, TableColumns};
pub use platform::Dm8Platform;
