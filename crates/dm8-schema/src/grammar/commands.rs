//! Statement compilers, one per command.

use super::columns::enum_values;
use super::{ConstraintKind, SchemaGrammar};
use crate::core::identifier::escape_literal;
use crate::core::schema::{Blueprint, Command, ForeignKeyCommand, IndexCommand};
use crate::core::traits::Dialect;
use crate::error::{Result, SchemaError};

/// Catalog query backing `has_table`; binds owner then table name.
pub const TABLE_EXISTS_SQL: &str =
    "select * from all_tables where upper(owner) = upper(?) and upper(table_name) = upper(?)";

/// Drops every table of the current user, then every sequence.
pub const DROP_ALL_TABLES_SQL: &str = "BEGIN
FOR c IN (SELECT table_name FROM user_tables) LOOP
EXECUTE IMMEDIATE ('DROP TABLE \"' || c.table_name || '\" CASCADE CONSTRAINTS');
END LOOP;
FOR s IN (SELECT sequence_name FROM user_sequences) LOOP
EXECUTE IMMEDIATE ('DROP SEQUENCE ' || s.sequence_name);
END LOOP;
END;";

impl<D: Dialect> SchemaGrammar<D> {
    /// `create table T ( <columns>[, <foreign keys>][, <primary key>] )`
    pub(super) fn compile_create(&self, blueprint: &Blueprint) -> Result<String> {
        let columns = blueprint
            .added_columns()
            .map(|column| self.column_definition(blueprint, column))
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!(
            "create table {} ( {}",
            self.wrap_table(&blueprint.table),
            columns.join(", ")
        );

        for foreign in blueprint.foreign_commands() {
            sql.push_str(", ");
            sql.push_str(&self.foreign_clause(foreign));
        }

        if let Some(primary) = blueprint.primary_command() {
            self.require_columns(blueprint, &primary.columns)?;
            sql.push_str(&format!(
                ", constraint {} primary key ( {} )",
                primary.index,
                self.columnize(&primary.columns)
            ));
        }

        sql.push_str(" )");
        Ok(sql)
    }

    /// One `alter table T add <column>` per column. A single-column
    /// auto-increment primary key is declared inline on its column.
    pub(super) fn compile_add(&self, blueprint: &Blueprint, columns: &[String]) -> Result<Vec<String>> {
        let table = self.wrap_table(&blueprint.table);
        let inline = inline_primary(blueprint);

        columns
            .iter()
            .map(|name| {
                let column = blueprint
                    .column(name)
                    .ok_or_else(|| SchemaError::unknown_column(&blueprint.table, name))?;
                let definition = self.column_definition(blueprint, column)?;

                Ok(match inline {
                    Some(primary) if primary.columns[0].eq_ignore_ascii_case(&column.name) => {
                        format!(
                            "alter table {} add {} constraint {} primary key",
                            table, definition, primary.index
                        )
                    }
                    _ => format!("alter table {} add {}", table, definition),
                })
            })
            .collect()
    }

    /// One `alter table T modify <column>` per changed column.
    pub(super) fn compile_change(&self, blueprint: &Blueprint, columns: &[String]) -> Result<Vec<String>> {
        let table = self.wrap_table(&blueprint.table);

        columns
            .iter()
            .map(|name| {
                let column = blueprint
                    .column(name)
                    .ok_or_else(|| SchemaError::unknown_column(&blueprint.table, name))?;
                Ok(format!(
                    "alter table {} modify {}",
                    table,
                    self.change_definition(blueprint, column)?
                ))
            })
            .collect()
    }

    pub(super) fn compile_primary(
        &self,
        blueprint: &Blueprint,
        primary: &IndexCommand,
    ) -> Result<Vec<String>> {
        if blueprint.creating() {
            self.require_columns(blueprint, &primary.columns)?;
            return Ok(Vec::new());
        }
        if primary.implied || is_inlined(blueprint, primary) {
            return Ok(Vec::new());
        }

        Ok(vec![format!(
            "alter table {} add constraint {} primary key ({})",
            self.wrap_table(&blueprint.table),
            primary.index,
            self.columnize(&primary.columns)
        )])
    }

    pub(super) fn compile_foreign(
        &self,
        blueprint: &Blueprint,
        foreign: &ForeignKeyCommand,
    ) -> Vec<String> {
        if blueprint.creating() {
            return Vec::new();
        }

        vec![format!(
            "alter table {} add {}",
            self.wrap_table(&blueprint.table),
            self.foreign_clause(foreign)
        )]
    }

    /// `constraint <idx> foreign key ( cols ) references T2 ( cols )[ on delete <action>]`
    fn foreign_clause(&self, foreign: &ForeignKeyCommand) -> String {
        let mut sql = format!(
            "constraint {} foreign key ( {} ) references {} ( {} )",
            foreign.index,
            self.columnize(&foreign.columns),
            self.wrap_table(&foreign.on),
            self.columnize(&foreign.references)
        );
        if let Some(action) = &foreign.on_delete {
            sql.push_str(&format!(" on delete {}", action));
        }
        sql
    }

    pub(super) fn compile_unique(&self, blueprint: &Blueprint, index: &IndexCommand) -> Result<String> {
        if blueprint.creating() {
            self.require_columns(blueprint, &index.columns)?;
        }
        Ok(format!(
            "create unique index {} on {} ( {} )",
            index.index,
            self.wrap_table(&blueprint.table),
            self.columnize(&index.columns)
        ))
    }

    pub(super) fn compile_index(&self, blueprint: &Blueprint, index: &IndexCommand) -> Result<String> {
        if blueprint.creating() {
            self.require_columns(blueprint, &index.columns)?;
        }
        Ok(format!(
            "create index {} on {} ( {} )",
            index.index,
            self.wrap_table(&blueprint.table),
            self.columnize(&index.columns)
        ))
    }

    pub(super) fn compile_drop(&self, blueprint: &Blueprint) -> String {
        format!("drop table {}", self.wrap_table(&blueprint.table))
    }

    /// Anonymous block dropping the table only when `user_tables` lists it.
    pub(super) fn compile_drop_if_exists(&self, blueprint: &Blueprint) -> String {
        format!(
            "declare c int;
begin
   select count(*) into c from user_tables where table_name = upper('{}');
   if c = 1 then
      execute immediate 'drop table {}';
   end if;
end;",
            escape_literal(&self.prefixed_table(&blueprint.table)),
            escape_literal(&self.wrap_table(&blueprint.table))
        )
    }

    pub(super) fn compile_drop_column(&self, blueprint: &Blueprint, columns: &[String]) -> Vec<String> {
        let table = self.wrap_table(&blueprint.table);
        columns
            .iter()
            .map(|column| format!("alter table {} drop column {}", table, self.wrap(column)))
            .collect()
    }

    /// Shared drop routine: indexes are dropped by name, every other kind
    /// as a table constraint.
    pub fn drop_constraint(&self, blueprint: &Blueprint, index: &str, kind: ConstraintKind) -> String {
        match kind {
            ConstraintKind::Index => format!("drop index if exists {}", index),
            ConstraintKind::Primary | ConstraintKind::Foreign => format!(
                "alter table {} drop constraint {}",
                self.wrap_table(&blueprint.table),
                index
            ),
        }
    }

    pub(super) fn compile_rename(&self, blueprint: &Blueprint, to: &str) -> String {
        format!(
            "alter table {} rename to {}",
            self.wrap_table(&blueprint.table),
            self.wrap_table(to)
        )
    }

    pub(super) fn compile_rename_column(&self, blueprint: &Blueprint, from: &str, to: &str) -> String {
        format!(
            "alter table {} rename column {} to {}",
            self.wrap_table(&blueprint.table),
            self.wrap(from),
            self.wrap(to)
        )
    }

    pub(super) fn compile_table_comment(&self, blueprint: &Blueprint, comment: &str) -> String {
        format!(
            "comment on table {} is '{}'",
            self.wrap_table(&blueprint.table),
            escape_literal(comment)
        )
    }

    /// Check constraints cannot be altered in place: drop, then re-add.
    pub(super) fn compile_update_enum(
        &self,
        blueprint: &Blueprint,
        column: &str,
        allowed: &[String],
    ) -> Vec<String> {
        let table = self.wrap_table(&blueprint.table);
        let column = self.wrap(column);
        let constraint =
            super::enum_constraint_name(&self.prefixed_table(&blueprint.table), &column);

        vec![
            format!("alter table {} drop constraint {}", table, constraint),
            format!(
                "alter table {} add constraint {} check ({} in ({}))",
                table,
                constraint,
                column,
                enum_values(allowed)
            ),
        ]
    }

    /// Column listing for `table` (already prefixed) owned by `database`.
    pub fn compile_column_exists(&self, database: &str, table: &str) -> String {
        format!(
            "select column_name from all_tab_cols where upper(owner) = upper('{}') and upper(table_name) = upper('{}')",
            escape_literal(database),
            escape_literal(table)
        )
    }

    fn require_columns(&self, blueprint: &Blueprint, columns: &[String]) -> Result<()> {
        match columns.iter().find(|name| blueprint.column(name).is_none()) {
            Some(missing) => Err(SchemaError::unknown_column(&blueprint.table, missing)),
            None => Ok(()),
        }
    }
}

/// The primary key when it is a single auto-increment column.
fn inline_primary(blueprint: &Blueprint) -> Option<&IndexCommand> {
    let primary = blueprint.primary_command()?;
    if primary.columns.len() != 1 {
        return None;
    }
    blueprint
        .column(&primary.columns[0])
        .filter(|column| column.auto_increment)
        .map(|_| primary)
}

/// Whether `primary` was declared inline by an `add` statement.
fn is_inlined(blueprint: &Blueprint, primary: &IndexCommand) -> bool {
    let Some(inline) = inline_primary(blueprint) else {
        return false;
    };
    if inline != primary {
        return false;
    }
    blueprint.commands.iter().any(|command| match command {
        Command::Add { columns } => columns
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&primary.columns[0])),
        _ => false,
    })
}
