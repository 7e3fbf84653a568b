//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use tracing::debug;

use crate::error::Result;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from `DB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup using the `DB_*` names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut connection = ConnectionConfig::default();
        let mut grammar = GrammarConfig::default();

        if let Some(v) = lookup("DB_TNS") {
            connection.tns = v;
        }
        if let Some(v) = lookup("DB_HOST") {
            connection.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            connection.port = v.trim().parse().map_err(|_| {
                crate::error::SchemaError::Config(format!("DB_PORT is not a valid port: {:?}", v))
            })?;
        }
        if let Some(v) = lookup("DB_DATABASE") {
            connection.database = v;
        }
        if let Some(v) = lookup("DB_USERNAME") {
            connection.username = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            connection.password = v;
        }
        if let Some(v) = lookup("DB_CHARSET") {
            connection.charset = v;
        }
        if let Some(v) = lookup("DB_ODBC_DRIVER") {
            connection.odbc_driver = v;
        }
        if let Some(v) = lookup("DB_PREFIX") {
            grammar.table_prefix = v;
        }
        if let Some(v) = lookup("DB_SCHEMA_PREFIX") {
            grammar.schema_prefix = v;
        }
        if let Some(v) = lookup("DB_LENGTH_IN_CHAR") {
            grammar.length_in_char = parse_flag("DB_LENGTH_IN_CHAR", &v)?;
        }
        if let Some(v) = lookup("DB_STRICT_MODE") {
            grammar.strict_mode = parse_flag("DB_STRICT_MODE", &v)?;
        }

        let config = Config {
            connection,
            grammar,
        };
        config.validate()?;
        debug!(
            "Loaded configuration from environment for database '{}'",
            config.connection.database
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" | "" => Ok(false),
        _ => Err(crate::error::SchemaError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}

impl ConnectionConfig {
    /// Build an ODBC connection string for the DM8 driver.
    pub fn connection_string(&self) -> String {
        let server = if self.tns.is_empty() {
            format!("Server={};TCP_Port={};", self.host, self.port)
        } else {
            format!("Server={};", self.tns)
        };

        format!(
            "Driver={{{}}};{}UID={};PWD={};CHARSET={};",
            self.odbc_driver, server, self.username, self.password, self.charset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_yaml_with_defaults() {
        let yaml = r#"
connection:
  host: 10.0.0.5
  database: APP
  username: SYSDBA
  password: secret
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.port, 5237);
        assert_eq!(config.connection.charset, "UTF8");
        assert_eq!(config.connection.driver, "dm");
        assert!(config.grammar.length_in_char);
        assert!(!config.grammar.strict_mode);
        assert_eq!(config.owner(), "APP");
    }

    #[test]
    fn test_owner_prefers_schema_prefix() {
        let yaml = r#"
connection:
  host: localhost
  database: APP
  username: SYSDBA
grammar:
  schema_prefix: SALES
  strict_mode: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.owner(), "SALES");
        assert!(config.grammar.strict_mode);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "connection:\n  host: localhost\n  database: APP\n  username: SYSDBA"
        )
        .unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.connection.host, "localhost");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/dm8.yaml").unwrap_err();
        assert!(matches!(err, crate::error::SchemaError::Io(_)));
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(env(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "5236"),
            ("DB_DATABASE", "APP"),
            ("DB_USERNAME", "SYSDBA"),
            ("DB_PASSWORD", "pw"),
            ("DB_PREFIX", "t_"),
            ("DB_LENGTH_IN_CHAR", "false"),
            ("DB_STRICT_MODE", "1"),
        ]))
        .unwrap();
        assert_eq!(config.connection.host, "db.internal");
        assert_eq!(config.connection.port, 5236);
        assert_eq!(config.grammar.table_prefix, "t_");
        assert!(!config.grammar.length_in_char);
        assert!(config.grammar.strict_mode);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(env(&[
            ("DB_HOST", "localhost"),
            ("DB_DATABASE", "APP"),
            ("DB_USERNAME", "SYSDBA"),
        ]))
        .unwrap();
        assert_eq!(config.connection.port, 5237);
        assert!(config.grammar.length_in_char);
        assert!(!config.grammar.strict_mode);
    }

    #[test]
    fn test_from_lookup_rejects_bad_port() {
        let err = Config::from_lookup(env(&[
            ("DB_HOST", "localhost"),
            ("DB_PORT", "not-a-port"),
            ("DB_DATABASE", "APP"),
            ("DB_USERNAME", "SYSDBA"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_flag() {
        let err = Config::from_lookup(env(&[
            ("DB_HOST", "localhost"),
            ("DB_DATABASE", "APP"),
            ("DB_USERNAME", "SYSDBA"),
            ("DB_STRICT_MODE", "maybe"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DB_STRICT_MODE"));
    }

    #[test]
    fn test_connection_string() {
        let conn = ConnectionConfig {
            host: "localhost".into(),
            database: "APP".into(),
            username: "SYSDBA".into(),
            password: "pw".into(),
            ..Default::default()
        };
        assert_eq!(
            conn.connection_string(),
            "Driver={DM8 ODBC DRIVER};Server=localhost;TCP_Port=5237;UID=SYSDBA;PWD=pw;CHARSET=UTF8;"
        );

        let conn = ConnectionConfig {
            tns: "DMSERVER".into(),
            ..conn
        };
        assert!(conn.connection_string().contains("Server=DMSERVER;UID="));
    }

    #[test]
    fn test_password_not_serialized() {
        let config = Config {
            connection: ConnectionConfig {
                host: "localhost".into(),
                database: "APP".into(),
                username: "SYSDBA".into(),
                password: "super_secret".into(),
                ..Default::default()
            },
            grammar: GrammarConfig::default(),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super_secret"), "Password was serialized: {}", json);
    }
}
