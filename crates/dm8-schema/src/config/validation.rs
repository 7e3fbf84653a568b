//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{Result, SchemaError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;

    if conn.driver != "dm" {
        return Err(SchemaError::Config(format!(
            "connection.driver must be 'dm', got '{}'",
            conn.driver
        )));
    }
    if conn.host.is_empty() && conn.tns.is_empty() {
        return Err(SchemaError::Config(
            "connection.host or connection.tns is required".into(),
        ));
    }
    if conn.database.is_empty() {
        return Err(SchemaError::Config("connection.database is required".into()));
    }
    if conn.username.is_empty() {
        return Err(SchemaError::Config("connection.username is required".into()));
    }
    if conn.port == 0 {
        return Err(SchemaError::Config("connection.port must be non-zero".into()));
    }

    if !config.grammar.schema_prefix.is_empty() {
        validate_identifier(&config.grammar.schema_prefix)
            .map_err(|e| SchemaError::Config(format!("grammar.schema_prefix: {}", e)))?;
    }
    if !config.grammar.table_prefix.is_empty() {
        validate_identifier(&config.grammar.table_prefix)
            .map_err(|e| SchemaError::Config(format!("grammar.table_prefix: {}", e)))?;
    }

    Ok(())
}
