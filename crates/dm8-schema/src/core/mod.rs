//! Core abstractions shared by the grammar and the catalog reader.
//!
//! - [`schema`]: Blueprint, column spec and command types
//! - [`identifier`]: Identifier validation and the reserved-word quoting policy
//! - [`value`]: Catalog row values with one canonical column-name casing
//! - [`traits`]: The connection collaborator and the dialect strategy

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use identifier::{validate_identifier, IdentifierPolicy};
pub use schema::{
    Blueprint, ColumnSpec, ColumnType, Command, DefaultValue, ForeignKeyCommand, IndexCommand,
};
pub use traits::{Connection, Dialect};
pub use value::{Row, SqlValue};
