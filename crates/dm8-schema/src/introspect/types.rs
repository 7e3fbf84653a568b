//! Normalized catalog records.

use serde::Serialize;

/// Column metadata read from `ALL_TAB_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    /// Column name, lower-cased.
    pub name: String,

    /// Catalog type name, lower-cased (e.g. "varchar2", "timestamp").
    pub data_type: String,

    /// Abstract type resolved through the platform registry.
    pub abstract_type: Option<String>,

    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub nullable: bool,

    /// Catalog default with surrounding single quotes removed.
    pub default: Option<String>,

    /// Position within the table (`COLUMN_ID`).
    pub ordinal: i64,
}

impl ColumnInfo {
    pub fn not_null(&self) -> bool {
        !self.nullable
    }
}

/// Index metadata read from `ALL_INDEXES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    /// Index name, lower-cased.
    pub name: String,
    pub unique: bool,

    /// Index type, lower-cased (e.g. "normal").
    pub index_type: String,
}

/// A table's columns in catalog order, addressable by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TableColumns {
    columns: Vec<ColumnInfo>,
}

impl TableColumns {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnInfo> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl IntoIterator for TableColumns {
    type Item = ColumnInfo;
    type IntoIter = std::vec::IntoIter<ColumnInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<'a> IntoIterator for &'a TableColumns {
    type Item = &'a ColumnInfo;
    type IntoIter = std::slice::Iter<'a, ColumnInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Strip one pair of surrounding single quotes from a catalog default:
/// `'active'` → `active`; `SYSDATE` passes through.
pub fn parse_default_value(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    match value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => Some(inner.to_string()),
        None => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, ordinal: i64) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: "int".to_string(),
            abstract_type: Some("integer".to_string()),
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            default: None,
            ordinal,
        }
    }

    #[test]
    fn test_parse_default_value() {
        assert_eq!(parse_default_value(None), None);
        assert_eq!(parse_default_value(Some("'active'")), Some("active".into()));
        assert_eq!(parse_default_value(Some("  '0' ")), Some("0".into()));
        assert_eq!(parse_default_value(Some("''")), Some("".into()));
        assert_eq!(parse_default_value(Some("SYSDATE")), Some("SYSDATE".into()));
        assert_eq!(parse_default_value(Some("'")), Some("'".into()));
    }

    #[test]
    fn test_table_columns_keep_order_and_lookup() {
        let columns = TableColumns::new(vec![column("id", 1), column("email", 2), column("age", 3)]);
        assert_eq!(columns.names(), vec!["id", "email", "age"]);
        assert_eq!(columns.get("EMAIL").map(|c| c.ordinal), Some(2));
        assert!(!columns.contains("missing"));
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn test_serializes_as_list() {
        let columns = TableColumns::new(vec![column("id", 1)]);
        let json = serde_json::to_value(&columns).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "id");
    }
}
