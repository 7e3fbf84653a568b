//! Catalog introspection over DM8's Oracle-compatible dictionary views.

mod types;

pub use types::{parse_default_value, ColumnInfo, IndexInfo, TableColumns};

use std::sync::Arc;

use tracing::debug;

use crate::core::traits::Connection;
use crate::core::value::Row;
use crate::error::{Result, SchemaError};
use crate::platform::Dm8Platform;

const LIST_COLUMNS_SQL: &str = "SELECT COLUMN_NAME, DATA_TYPE, DATA_LENGTH, DATA_PRECISION, \
     DATA_SCALE, NULLABLE, DATA_DEFAULT, COLUMN_ID FROM ALL_TAB_COLUMNS \
     WHERE OWNER = UPPER(?) AND TABLE_NAME = UPPER(?) ORDER BY COLUMN_ID";

const LIST_INDEXES_SQL: &str = "SELECT INDEX_NAME, UNIQUENESS, INDEX_TYPE FROM ALL_INDEXES \
     WHERE TABLE_OWNER = UPPER(?) AND TABLE_NAME = UPPER(?) ORDER BY INDEX_NAME";

const LIST_TABLES_SQL: &str =
    "SELECT TABLE_NAME FROM ALL_TABLES WHERE OWNER = UPPER(?) ORDER BY TABLE_NAME";

/// Reads table, column and index metadata for one owner.
pub struct SchemaManager {
    connection: Arc<dyn Connection>,
    owner: String,
    platform: Dm8Platform,
}

impl SchemaManager {
    pub fn new(connection: Arc<dyn Connection>, owner: impl Into<String>) -> Self {
        Self {
            connection,
            owner: owner.into(),
            platform: Dm8Platform::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn platform(&self) -> &Dm8Platform {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut Dm8Platform {
        &mut self.platform
    }

    /// Columns of `table` in `COLUMN_ID` order.
    pub async fn list_table_columns(&self, table: &str) -> Result<TableColumns> {
        let params = [self.owner.clone(), table.to_uppercase()];
        let rows = self.connection.select(LIST_COLUMNS_SQL, &params).await?;

        let columns = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.column_from_row(row, i as i64 + 1))
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} columns for {}.{}", columns.len(), self.owner, table);
        Ok(TableColumns::new(columns))
    }

    /// One column of `table`, or `None` when the catalog has no such column.
    pub async fn get_column(&self, table: &str, column: &str) -> Result<Option<ColumnInfo>> {
        let columns = self.list_table_columns(table).await?;
        Ok(columns.get(column).cloned())
    }

    /// Indexes of `table` ordered by name.
    pub async fn list_table_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        let params = [self.owner.clone(), table.to_uppercase()];
        let rows = self.connection.select(LIST_INDEXES_SQL, &params).await?;

        let indexes = rows
            .iter()
            .map(|row| {
                Ok(IndexInfo {
                    name: required(row, "INDEX_NAME", LIST_INDEXES_SQL)?.to_lowercase(),
                    unique: row
                        .text("UNIQUENESS")
                        .is_some_and(|u| u.eq_ignore_ascii_case("UNIQUE")),
                    index_type: row.text("INDEX_TYPE").unwrap_or_default().to_lowercase(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} indexes for {}.{}", indexes.len(), self.owner, table);
        Ok(indexes)
    }

    /// Table names owned by the owner, lower-cased.
    pub async fn list_table_names(&self) -> Result<Vec<String>> {
        let rows = self
            .connection
            .select(LIST_TABLES_SQL, &[self.owner.clone()])
            .await?;

        let names = rows
            .iter()
            .map(|row| required(row, "TABLE_NAME", LIST_TABLES_SQL).map(|n| n.to_lowercase()))
            .collect::<Result<Vec<_>>>()?;

        debug!("Found {} tables owned by {}", names.len(), self.owner);
        Ok(names)
    }

    fn column_from_row(&self, row: &Row, position: i64) -> Result<ColumnInfo> {
        let name = required(row, "COLUMN_NAME", LIST_COLUMNS_SQL)?.to_lowercase();
        let data_type = row.text("DATA_TYPE").unwrap_or_default().to_lowercase();
        let abstract_type = self.platform.abstract_type(&data_type).map(str::to_string);

        Ok(ColumnInfo {
            name,
            abstract_type,
            length: row.int("DATA_LENGTH"),
            precision: row.int("DATA_PRECISION"),
            scale: row.int("DATA_SCALE"),
            nullable: row.text("NULLABLE").as_deref() == Some("Y"),
            default: parse_default_value(row.text("DATA_DEFAULT").as_deref()),
            ordinal: row.int("COLUMN_ID").unwrap_or(position),
            data_type,
        })
    }
}

fn required(row: &Row, column: &str, sql: &str) -> Result<String> {
    row.text(column)
        .ok_or_else(|| SchemaError::database(format!("catalog row has no {}", column), sql))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::SqlValue;
    use crate::testing::MockConnection;

    fn column_row(
        name: &str,
        data_type: &str,
        nullable: &str,
        default: Option<&str>,
        ordinal: i64,
    ) -> Row {
        Row::new()
            .with("column_name", name)
            .with("data_type", data_type)
            .with("data_length", 50_i64)
            .with("data_precision", SqlValue::Null)
            .with("data_scale", SqlValue::Null)
            .with("nullable", nullable)
            .with("data_default", default)
            .with("column_id", ordinal)
    }

    fn manager(conn: MockConnection) -> (Arc<MockConnection>, SchemaManager) {
        let conn = Arc::new(conn);
        let manager = SchemaManager::new(conn.clone(), "APP");
        (conn, manager)
    }

    #[tokio::test]
    async fn test_list_table_columns_normalizes_rows() {
        let (conn, manager) = manager(MockConnection::new().with_rows(vec![
            column_row("ID", "INT", "N", None, 1),
            column_row("STATUS", "VARCHAR2", "Y", Some("'active'"), 2),
            column_row("CREATED_AT", "TIMESTAMP", "N", Some("SYSDATE "), 3),
        ]));

        let columns = manager.list_table_columns("users").await.unwrap();

        let queries = conn.queries();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].0.contains("FROM ALL_TAB_COLUMNS"));
        assert!(queries[0].0.ends_with("ORDER BY COLUMN_ID"));
        assert_eq!(queries[0].1, vec!["APP".to_string(), "USERS".to_string()]);

        let status = columns.get("status").unwrap();
        assert_eq!(status.data_type, "varchar2");
        assert_eq!(status.abstract_type.as_deref(), Some("string"));
        assert!(status.nullable);
        assert_eq!(status.default.as_deref(), Some("active"));
        assert_eq!(status.length, Some(50));

        let created = columns.get("created_at").unwrap();
        assert!(created.not_null());
        assert_eq!(created.default.as_deref(), Some("SYSDATE"));
        assert_eq!(created.abstract_type.as_deref(), Some("datetime"));

        let id = columns.get("ID").unwrap();
        assert_eq!(id.default, None);
        assert_eq!(id.precision, None);
    }

    #[tokio::test]
    async fn test_list_table_columns_preserves_ordinal_order() {
        let (_conn, manager) = manager(MockConnection::new().with_rows(vec![
            column_row("ZETA", "INT", "Y", None, 1),
            column_row("ALPHA", "INT", "Y", None, 2),
            column_row("MID", "INT", "Y", None, 3),
        ]));

        let columns = manager.list_table_columns("t").await.unwrap();
        assert_eq!(columns.names(), vec!["zeta", "alpha", "mid"]);
        let ordinals: Vec<i64> = columns.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_textual_numbers_from_driver() {
        let row = Row::new()
            .with("COLUMN_NAME", "AMOUNT")
            .with("DATA_TYPE", "DECIMAL")
            .with("DATA_PRECISION", "10")
            .with("DATA_SCALE", "2")
            .with("NULLABLE", "Y")
            .with("COLUMN_ID", "4");
        let (_conn, manager) = manager(MockConnection::new().with_rows(vec![row]));

        let columns = manager.list_table_columns("orders").await.unwrap();
        let amount = columns.get("amount").unwrap();
        assert_eq!(amount.precision, Some(10));
        assert_eq!(amount.scale, Some(2));
        assert_eq!(amount.ordinal, 4);
        assert_eq!(amount.abstract_type.as_deref(), Some("decimal"));
    }

    #[tokio::test]
    async fn test_get_column_hit_and_miss() {
        let (_conn, manager) = manager(
            MockConnection::new()
                .with_rows(vec![column_row("EMAIL", "VARCHAR2", "N", None, 1)])
                .with_rows(vec![column_row("EMAIL", "VARCHAR2", "N", None, 1)]),
        );

        let email = manager.get_column("users", "Email").await.unwrap();
        assert_eq!(email.map(|c| c.name), Some("email".to_string()));

        let missing = manager.get_column("users", "phone").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_table_indexes() {
        let (conn, manager) = manager(MockConnection::new().with_rows(vec![
            Row::new()
                .with("INDEX_NAME", "USERS_EMAIL_UNIQUE")
                .with("UNIQUENESS", "UNIQUE")
                .with("INDEX_TYPE", "NORMAL"),
            Row::new()
                .with("INDEX_NAME", "USERS_NAME_INDEX")
                .with("UNIQUENESS", "NONUNIQUE")
                .with("INDEX_TYPE", "NORMAL"),
        ]));

        let indexes = manager.list_table_indexes("users").await.unwrap();
        assert_eq!(
            indexes,
            vec![
                IndexInfo {
                    name: "users_email_unique".into(),
                    unique: true,
                    index_type: "normal".into(),
                },
                IndexInfo {
                    name: "users_name_index".into(),
                    unique: false,
                    index_type: "normal".into(),
                },
            ]
        );
        assert!(conn.queries()[0].0.contains("FROM ALL_INDEXES"));
        assert_eq!(conn.queries()[0].1, vec!["APP".to_string(), "USERS".to_string()]);
    }

    #[tokio::test]
    async fn test_list_table_names() {
        let (conn, manager) = manager(MockConnection::new().with_rows(vec![
            Row::new().with("TABLE_NAME", "ORDERS"),
            Row::new().with("TABLE_NAME", "USERS"),
        ]));

        assert_eq!(manager.list_table_names().await.unwrap(), vec!["orders", "users"]);
        assert_eq!(conn.queries()[0].1, vec!["APP".to_string()]);
    }

    #[tokio::test]
    async fn test_database_error_propagates_unchanged() {
        let (_conn, manager) = manager(MockConnection::new().failing_on("ALL_TAB_COLUMNS"));

        let err = manager.list_table_columns("users").await.unwrap_err();
        match err {
            SchemaError::Database { message, .. } => {
                assert_eq!(message, "-2124: duplicate object name")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_row_without_name_is_rejected() {
        let (_conn, manager) = manager(
            MockConnection::new().with_rows(vec![Row::new().with("DATA_TYPE", "INT")]),
        );
        assert!(manager.list_table_columns("t").await.is_err());
    }
}
