//! Identifier validation and the DM8 quoting policy.
//!
//! DM8 identifiers are emitted bare: the dialect's quote character is empty so
//! that unquoted names fold to upper case the way the server expects. Only
//! names that collide with a reserved word are wrapped, and those are wrapped
//! upper-cased in double quotes so they still resolve to the folded name.
//!
//! SQL identifiers cannot be bound as statement parameters, so every name that
//! reaches generated DDL is validated first (null bytes, excessive length).

use std::collections::HashSet;

use crate::error::{Result, SchemaError};

/// Maximum identifier length accepted before quoting.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Words DM8 refuses as bare identifiers.
const DM8_RESERVED_WORDS: &[&str] = &[
    "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "ARRAY", "AS", "ASC", "AUDIT", "BEGIN",
    "BETWEEN", "BY", "CASE", "CAST", "CHAR", "CHECK", "CLUSTER", "COLUMN", "COMMENT", "COMMIT",
    "COMPRESS", "CONNECT", "CONSTRAINT", "CONTEXT", "CREATE", "CROSS", "CURRENT", "CURSOR",
    "DATE", "DECIMAL", "DECLARE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DOMAIN", "DROP",
    "ELSE", "END", "EXCEPTION", "EXCLUSIVE", "EXEC", "EXECUTE", "EXISTS", "EXIT", "FALSE",
    "FETCH", "FILE", "FLOAT", "FOR", "FOREIGN", "FROM", "FULL", "FUNCTION", "GOTO", "GRANT",
    "GROUP", "HAVING", "IDENTIFIED", "IDENTITY", "IF", "IMMEDIATE", "IN", "INCREMENT", "INDEX",
    "INITIAL", "INNER", "INSERT", "INTEGER", "INTERSECT", "INTERVAL", "INTO", "IS", "JOIN",
    "LEFT", "LEVEL", "LIKE", "LIMIT", "LOCK", "LOGIN", "LONG", "LOOP", "MAXEXTENTS", "MINUS",
    "MLSLABEL", "MODE", "MODIFY", "NATURAL", "NEW", "NEXT", "NOAUDIT", "NOCOMPRESS", "NOT",
    "NOWAIT", "NULL", "NUMBER", "OF", "OFFLINE", "OFFSET", "ON", "ONLINE", "OPTION", "OR",
    "ORDER", "OUTER", "OVERLAPS", "PCTFREE", "PRIMARY", "PRIOR", "PRIVILEGES", "PROCEDURE",
    "PUBLIC", "RAISE", "RAW", "REFERENCES", "RENAME", "RESOURCE", "RETURN", "REVOKE", "RIGHT",
    "ROLLBACK", "ROW", "ROWID", "ROWNUM", "ROWS", "SAVEPOINT", "SELECT", "SESSION", "SET",
    "SHARE", "SIZE", "SMALLINT", "SOME", "START", "SUCCESSFUL", "SYNONYM", "SYSDATE", "TABLE",
    "THEN", "TO", "TOP", "TRIGGER", "TRUE", "TRUNCATE", "UID", "UNION", "UNIQUE", "UPDATE",
    "USER", "USING", "VALIDATE", "VALUES", "VARCHAR", "VARCHAR2", "VERIFY", "VIEW", "WHEN",
    "WHENEVER", "WHERE", "WITH",
];

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `SchemaError::Config` for invalid identifiers with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SchemaError::Config("Identifier cannot be empty".to_string()));
    }

    if name.contains('\0') {
        return Err(SchemaError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(SchemaError::Config(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Reserved-word driven quoting for DM8 identifiers.
///
/// The DM8 dialect owns one of these and routes every identifier segment
/// through [`IdentifierPolicy::wrap_value`].
#[derive(Debug, Clone)]
pub struct IdentifierPolicy {
    reserved: HashSet<String>,
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self::dm8()
    }
}

impl IdentifierPolicy {
    /// Policy over the built-in DM8 reserved-word set.
    pub fn dm8() -> Self {
        Self::with_reserved(DM8_RESERVED_WORDS.iter().copied())
    }

    /// Policy over a caller-supplied reserved-word set.
    pub fn with_reserved<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            reserved: words
                .into_iter()
                .map(|w| w.as_ref().to_uppercase())
                .collect(),
        }
    }

    /// Case-insensitive reserved-word lookup.
    pub fn is_reserved(&self, identifier: &str) -> bool {
        self.reserved.contains(&identifier.to_uppercase())
    }

    /// Quote a single identifier segment if it is reserved.
    ///
    /// Reserved words come back upper-cased in double quotes, everything else
    /// is returned unchanged. `*` always passes through.
    pub fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        if self.is_reserved(value) {
            return format!("\"{}\"", value.replace('"', "\"\"")).to_uppercase();
        }
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Table123").is_ok());
        assert!(validate_identifier("用户表").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_rejects_too_long() {
        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = validate_identifier(&long_name);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_validate_identifier_accepts_max_length() {
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("O'Brien"), "O''Brien");
        assert_eq!(escape_literal("plain"), "plain");
    }

    // =========================================================================
    // Quoting policy tests
    // =========================================================================

    #[test]
    fn test_plain_identifiers_pass_through() {
        let policy = IdentifierPolicy::dm8();
        assert_eq!(policy.wrap_value("users"), "users");
        assert_eq!(policy.wrap_value("Email"), "Email");
    }

    #[test]
    fn test_reserved_identifiers_are_quoted_upper_case() {
        let policy = IdentifierPolicy::dm8();
        assert_eq!(policy.wrap_value("user"), "\"USER\"");
        assert_eq!(policy.wrap_value("Comment"), "\"COMMENT\"");
        assert_eq!(policy.wrap_value("level"), "\"LEVEL\"");
    }

    #[test]
    fn test_wildcard_never_wrapped() {
        let policy = IdentifierPolicy::with_reserved(["*"]);
        assert_eq!(policy.wrap_value("*"), "*");
    }

    #[test]
    fn test_custom_reserved_set() {
        let policy = IdentifierPolicy::with_reserved(["status"]);
        assert!(policy.is_reserved("STATUS"));
        assert_eq!(policy.wrap_value("status"), "\"STATUS\"");
        assert_eq!(policy.wrap_value("user"), "user");
    }
}
