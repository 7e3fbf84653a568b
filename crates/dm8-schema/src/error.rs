//! Error types for the DM8 schema layer.

use thiserror::Error;

/// Main error type for grammar, introspection and builder operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Configuration error (invalid YAML, missing fields, bad identifiers, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command references a column the blueprint does not carry.
    #[error("Unknown column '{column}' on table {table}")]
    UnknownColumn { table: String, column: String },

    /// A column spec is missing attributes its type requires.
    #[error("Invalid column '{column}': {message}")]
    InvalidColumn { column: String, message: String },

    /// Abstract column type with no DM8 mapping.
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// The database rejected a statement. The message is the driver's text.
    #[error("Database error: {message}\n  SQL: {sql}")]
    Database { message: String, sql: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Create a Database error for a statement the connection rejected.
    pub fn database(message: impl Into<String>, sql: impl Into<String>) -> Self {
        SchemaError::Database {
            message: message.into(),
            sql: sql.into(),
        }
    }

    /// Create an UnknownColumn error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        SchemaError::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an InvalidColumn error
    pub fn invalid_column(column: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::InvalidColumn {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            SchemaError::Config(_)
            | SchemaError::UnknownColumn { .. }
            | SchemaError::InvalidColumn { .. }
            | SchemaError::UnsupportedType(_)
            | SchemaError::Yaml(_)
            | SchemaError::Json(_) => 1,
            SchemaError::Database { .. } => 2,
            SchemaError::Io(_) => 3,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_keeps_driver_message() {
        let err = SchemaError::database("[CODE:-2124]Object already exists", "create table users ( id int )");
        let text = err.to_string();
        assert!(text.contains("[CODE:-2124]Object already exists"));
        assert!(text.contains("create table users"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SchemaError::Config("x".into()).exit_code(), 1);
        assert_eq!(SchemaError::unknown_column("users", "email").exit_code(), 1);
        assert_eq!(SchemaError::UnsupportedType("geometry".into()).exit_code(), 1);
    }

    #[test]
    fn test_format_detailed_includes_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.yaml");
        let err = SchemaError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error: missing.yaml"));
    }
}
