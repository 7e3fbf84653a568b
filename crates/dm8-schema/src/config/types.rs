//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// DM8 connection settings.
    pub connection: ConnectionConfig,

    /// Grammar behavior.
    #[serde(default)]
    pub grammar: GrammarConfig,
}

impl Config {
    /// Catalog owner used by introspection: the schema prefix when set,
    /// otherwise the database name.
    pub fn owner(&self) -> &str {
        if self.grammar.schema_prefix.is_empty() {
            &self.connection.database
        } else {
            &self.grammar.schema_prefix
        }
    }
}

/// DM8 connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Driver name (always "dm").
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Connect descriptor; takes precedence over host/port when set.
    #[serde(default)]
    pub tns: String,

    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Database port (default: 5237).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database (schema owner) name.
    pub database: String,

    /// Username.
    pub username: String,

    /// Password.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Client character set (default: "UTF8").
    #[serde(default = "default_charset")]
    pub charset: String,

    /// ODBC driver name registered on the client host.
    #[serde(default = "default_odbc_driver")]
    pub odbc_driver: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            tns: String::new(),
            host: String::new(),
            port: default_port(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            charset: default_charset(),
            odbc_driver: default_odbc_driver(),
        }
    }
}

/// Grammar configuration: fixed at construction, or changed through the
/// grammar's `&mut` setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Schema qualifying every table name; empty for none.
    #[serde(default)]
    pub schema_prefix: String,

    /// Prefix prepended to every table name.
    #[serde(default)]
    pub table_prefix: String,

    /// Count string lengths in characters (`varchar2(n char)`).
    #[serde(default = "default_true")]
    pub length_in_char: bool,

    /// Disable implicit defaults for NOT NULL columns.
    #[serde(default)]
    pub strict_mode: bool,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            schema_prefix: String::new(),
            table_prefix: String::new(),
            length_in_char: true,
            strict_mode: false,
        }
    }
}

// Default value functions for serde
fn default_driver() -> String {
    "dm".to_string()
}

fn default_port() -> u16 {
    5237
}

fn default_charset() -> String {
    "UTF8".to_string()
}

fn default_odbc_driver() -> String {
    "DM8 ODBC DRIVER".to_string()
}

fn default_true() -> bool {
    true
}
