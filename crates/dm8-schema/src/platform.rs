//! DM8 platform description: name, quoting and the catalog type registry.

use std::collections::HashMap;

use crate::dialect::normalize_type;

/// Catalog type name → abstract type name.
const DM8_TYPE_MAPPINGS: &[(&str, &str)] = &[
    // numeric
    ("tinyint", "smallint"),
    ("smallint", "smallint"),
    ("int", "integer"),
    ("integer", "integer"),
    ("bigint", "bigint"),
    ("number", "integer"),
    ("numeric", "decimal"),
    ("decimal", "decimal"),
    ("real", "float"),
    ("float", "float"),
    ("double", "float"),
    ("binary_float", "float"),
    ("binary_double", "float"),
    ("pls_integer", "integer"),
    ("binary_integer", "integer"),
    // character
    ("char", "string"),
    ("character", "string"),
    ("varchar", "string"),
    ("varchar2", "string"),
    ("nvarchar", "string"),
    ("nvarchar2", "string"),
    ("longvarchar", "text"),
    ("clob", "text"),
    ("text", "text"),
    ("long", "text"),
    // binary
    ("binary", "blob"),
    ("varbinary", "blob"),
    ("longvarbinary", "blob"),
    ("blob", "blob"),
    ("raw", "binary"),
    ("long raw", "blob"),
    ("bfile", "blob"),
    ("image", "blob"),
    // date/time
    ("date", "date"),
    ("time", "time"),
    ("timestamp", "datetime"),
    ("datetime", "datetime"),
    // other
    ("boolean", "boolean"),
    ("rowid", "string"),
    ("urowid", "string"),
    ("xml", "string"),
    ("json", "json"),
    ("interval year", "string"),
    ("interval day", "string"),
];

/// The DM8 platform.
#[derive(Debug, Clone)]
pub struct Dm8Platform {
    type_mappings: HashMap<String, String>,
}

impl Default for Dm8Platform {
    fn default() -> Self {
        Self::new()
    }
}

impl Dm8Platform {
    pub fn new() -> Self {
        Self {
            type_mappings: DM8_TYPE_MAPPINGS
                .iter()
                .map(|(db, abstract_type)| (db.to_string(), abstract_type.to_string()))
                .collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        "dm8"
    }

    /// Identifiers are emitted unquoted.
    pub fn identifier_quote(&self) -> &'static str {
        ""
    }

    /// Register or override the abstract type of a catalog type.
    pub fn register_type_mapping(&mut self, db_type: &str, abstract_type: &str) {
        self.type_mappings
            .insert(db_type.to_lowercase(), abstract_type.to_string());
    }

    /// Abstract type of a catalog type name.
    ///
    /// Parameters are ignored (`VARCHAR2(50)` → `string`), and multi-word
    /// names fall back to their longest registered prefix
    /// (`TIMESTAMP WITH TIME ZONE` → `datetime`,
    /// `INTERVAL DAY TO SECOND` → `string`).
    pub fn abstract_type(&self, db_type: &str) -> Option<&str> {
        let normalized = normalize_type(db_type);
        if let Some(mapped) = self.type_mappings.get(&normalized) {
            return Some(mapped);
        }

        self.type_mappings
            .iter()
            .filter(|(key, _)| {
                normalized
                    .strip_prefix(key.as_str())
                    .is_some_and(|rest| rest.starts_with(' '))
            })
            .max_by_key(|(key, _)| key.len())
            .map(|(_, mapped)| mapped.as_str())
    }
}
