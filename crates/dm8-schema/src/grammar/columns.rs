//! Column definitions and modifiers.
//!
//! A definition is `<name> <type>` followed by the increment modifier and
//! then the nullable modifier. The nullable modifier carries the default
//! too: DM8 requires `default` ahead of `null`/`not null`.

use tracing::debug;

use super::SchemaGrammar;
use crate::core::identifier::escape_literal;
use crate::core::schema::{Blueprint, ColumnSpec, DefaultValue};
use crate::core::traits::Dialect;
use crate::error::Result;

/// Name of the check constraint backing an enum column:
/// `<table>_<column>_enum`, lower-cased, with quote characters removed.
pub fn enum_constraint_name(table: &str, column: &str) -> String {
    let strip = |s: &str| s.to_lowercase().replace(['"', '\'', '`'], "");
    format!("{}_{}_enum", strip(table), strip(column))
}

impl<D: Dialect> SchemaGrammar<D> {
    /// Definition used by `create` and `add`, implicit default applied.
    pub fn column_definition(&self, blueprint: &Blueprint, column: &ColumnSpec) -> Result<String> {
        let type_sql = self.dialect.map_type(column)?;
        let default = self.effective_default(blueprint, column, &type_sql);
        Ok(self.render_column(blueprint, column, &type_sql, default.as_ref()))
    }

    /// Definition used by `change`: only an explicit default is rendered.
    pub(super) fn change_definition(&self, blueprint: &Blueprint, column: &ColumnSpec) -> Result<String> {
        let type_sql = self.dialect.map_type(column)?;
        Ok(self.render_column(blueprint, column, &type_sql, column.default.as_ref()))
    }

    fn render_column(
        &self,
        blueprint: &Blueprint,
        column: &ColumnSpec,
        type_sql: &str,
        default: Option<&DefaultValue>,
    ) -> String {
        let mut sql = format!("{} {}", self.wrap(&column.name), type_sql);
        sql.push_str(&self.modify_increment(column));
        sql.push_str(&self.modify_nullable(blueprint, column, default));
        sql
    }

    /// ` auto_increment` for auto-increment serial columns.
    pub fn modify_increment(&self, column: &ColumnSpec) -> String {
        if column.auto_increment && self.dialect.is_serial(column.column_type) {
            format!(" {}", self.dialect.auto_increment_keyword())
        } else {
            String::new()
        }
    }

    /// `[ default <v>] null|not null[ constraint <n> check (<col> in (...))]`
    pub fn modify_nullable(
        &self,
        blueprint: &Blueprint,
        column: &ColumnSpec,
        default: Option<&DefaultValue>,
    ) -> String {
        let mut sql = if column.nullable {
            " null".to_string()
        } else {
            " not null".to_string()
        };

        if !column.allowed.is_empty() {
            let name = self.wrap(&column.name);
            let constraint =
                enum_constraint_name(&self.prefixed_table(&blueprint.table), &name);
            sql.push_str(&format!(
                " constraint {} check ({} in ({}))",
                constraint,
                name,
                enum_values(&column.allowed)
            ));
        }

        match default {
            Some(value) => format!(" default {}{}", self.dialect.default_literal(value), sql),
            None => sql,
        }
    }

    /// The explicit default, or the dialect's implicit one for NOT NULL
    /// columns outside the primary key when strict mode is off.
    fn effective_default(
        &self,
        blueprint: &Blueprint,
        column: &ColumnSpec,
        type_sql: &str,
    ) -> Option<DefaultValue> {
        if column.default.is_some() {
            return column.default.clone();
        }
        if self.strict_mode || column.nullable || column.auto_increment || column.primary {
            return None;
        }
        let in_primary = blueprint.primary_command().is_some_and(|primary| {
            primary
                .columns
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&column.name))
        });
        if in_primary {
            return None;
        }

        let value = self.dialect.implicit_default(type_sql);
        if let Some(value) = &value {
            debug!(
                "Implicit default {} for NOT NULL column {}.{}",
                self.dialect.default_literal(value),
                blueprint.table,
                column.name
            );
        }
        value
    }
}

/// `'a', 'b'` with quotes escaped.
pub(super) fn enum_values(allowed: &[String]) -> String {
    allowed
        .iter()
        .map(|v| format!("'{}'", escape_literal(v)))
        .collect::<Vec<_>>()
        .join(", ")
}
