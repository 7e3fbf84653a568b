//! Blueprint, column and command types describing one table's desired shape.
//!
//! A [`Blueprint`] is dialect-agnostic: it carries the column specs and the
//! structural commands for a single table. The grammar turns it into DM8 SQL.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::identifier::escape_literal;
use crate::error::{Result, SchemaError};

/// Abstract column type, independent of any SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    BigInteger,
    Integer,
    MediumInteger,
    SmallInteger,
    TinyInteger,
    Float,
    Double,
    Decimal,
    Boolean,
    Char,
    String,
    Nvarchar2,
    Text,
    MediumText,
    LongText,
    Enum,
    Date,
    DateTime,
    Time,
    Timestamp,
    TimestampTz,
    Binary,
    Uuid,
    IpAddress,
    MacAddress,
    Json,
    Jsonb,
}

impl ColumnType {
    /// Every supported abstract type, in declaration order.
    pub const ALL: [ColumnType; 27] = [
        ColumnType::BigInteger,
        ColumnType::Integer,
        ColumnType::MediumInteger,
        ColumnType::SmallInteger,
        ColumnType::TinyInteger,
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::Decimal,
        ColumnType::Boolean,
        ColumnType::Char,
        ColumnType::String,
        ColumnType::Nvarchar2,
        ColumnType::Text,
        ColumnType::MediumText,
        ColumnType::LongText,
        ColumnType::Enum,
        ColumnType::Date,
        ColumnType::DateTime,
        ColumnType::Time,
        ColumnType::Timestamp,
        ColumnType::TimestampTz,
        ColumnType::Binary,
        ColumnType::Uuid,
        ColumnType::IpAddress,
        ColumnType::MacAddress,
        ColumnType::Json,
        ColumnType::Jsonb,
    ];

    /// The camelCase name used in blueprint files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::BigInteger => "bigInteger",
            ColumnType::Integer => "integer",
            ColumnType::MediumInteger => "mediumInteger",
            ColumnType::SmallInteger => "smallInteger",
            ColumnType::TinyInteger => "tinyInteger",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Decimal => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::Char => "char",
            ColumnType::String => "string",
            ColumnType::Nvarchar2 => "nvarchar2",
            ColumnType::Text => "text",
            ColumnType::MediumText => "mediumText",
            ColumnType::LongText => "longText",
            ColumnType::Enum => "enum",
            ColumnType::Date => "date",
            ColumnType::DateTime => "dateTime",
            ColumnType::Time => "time",
            ColumnType::Timestamp => "timestamp",
            ColumnType::TimestampTz => "timestampTz",
            ColumnType::Binary => "binary",
            ColumnType::Uuid => "uuid",
            ColumnType::IpAddress => "ipAddress",
            ColumnType::MacAddress => "macAddress",
            ColumnType::Json => "json",
            ColumnType::Jsonb => "jsonb",
        }
    }

    /// Integer types that may carry `auto_increment`.
    pub fn is_serial(&self) -> bool {
        matches!(
            self,
            ColumnType::BigInteger
                | ColumnType::Integer
                | ColumnType::MediumInteger
                | ColumnType::SmallInteger
                | ColumnType::TinyInteger
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        ColumnType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::UnsupportedType(s.to_string()))
    }
}

impl TryFrom<String> for ColumnType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.as_str().to_string()
    }
}

/// An explicit column default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Raw SQL expression emitted without quoting (e.g. `SYSDATE`).
    Expression { expression: String },
}

impl DefaultValue {
    /// Raw SQL expression default.
    pub fn expression(sql: impl Into<String>) -> Self {
        DefaultValue::Expression {
            expression: sql.into(),
        }
    }

    /// Render as the literal that follows `default` in a column definition.
    ///
    /// Every non-expression value is emitted as a quoted string, booleans as
    /// `'1'`/`'0'`.
    pub fn to_sql_literal(&self) -> String {
        match self {
            DefaultValue::Bool(v) => format!("'{}'", u8::from(*v)),
            DefaultValue::Int(v) => format!("'{}'", v),
            DefaultValue::Float(v) => format!("'{}'", v),
            DefaultValue::Text(v) => format!("'{}'", escape_literal(v)),
            DefaultValue::Expression { expression } => expression.clone(),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(v: &str) -> Self {
        DefaultValue::Text(v.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(v: String) -> Self {
        DefaultValue::Text(v)
    }
}

impl From<i64> for DefaultValue {
    fn from(v: i64) -> Self {
        DefaultValue::Int(v)
    }
}

impl From<i32> for DefaultValue {
    fn from(v: i32) -> Self {
        DefaultValue::Int(v as i64)
    }
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        DefaultValue::Float(v)
    }
}

impl From<bool> for DefaultValue {
    fn from(v: bool) -> Self {
        DefaultValue::Bool(v)
    }
}

/// One column of a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Column name, unique within the blueprint.
    pub name: String,

    /// Abstract type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Character length for string-family types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Total digits for numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Digits after the decimal point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places: Option<u32>,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub auto_increment: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    /// Allowed values for enum columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,

    /// Fluent primary-key flag.
    #[serde(default)]
    pub primary: bool,

    /// Fluent unique-index flag.
    #[serde(default)]
    pub unique: bool,

    /// Fluent plain-index flag.
    #[serde(default)]
    pub index: bool,

    /// The column already exists and is being modified.
    #[serde(default)]
    pub change: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: None,
            total: None,
            places: None,
            nullable: true,
            auto_increment: false,
            default: None,
            allowed: Vec::new(),
            primary: false,
            unique: false,
            index: false,
            change: false,
        }
    }

    pub fn nullable(&mut self, value: bool) -> &mut Self {
        self.nullable = value;
        self
    }

    pub fn not_null(&mut self) -> &mut Self {
        self.nullable = false;
        self
    }

    pub fn default(&mut self, value: impl Into<DefaultValue>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn length(&mut self, length: u32) -> &mut Self {
        self.length = Some(length);
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    pub fn index(&mut self) -> &mut Self {
        self.index = true;
        self
    }

    /// Mark the column as a modification of an existing column.
    pub fn change(&mut self) -> &mut Self {
        self.change = true;
        self
    }
}

/// Named index or key over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCommand {
    /// Constraint/index name. Generated when left empty.
    #[serde(default)]
    pub index: String,

    pub columns: Vec<String>,

    /// Registered by the auto-increment pre-pass rather than by the caller.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub implied: bool,
}

impl IndexCommand {
    pub fn new(index: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index: index.into(),
            columns,
            implied: false,
        }
    }
}

/// Foreign key definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyCommand {
    /// Constraint name. Generated when left empty.
    #[serde(default)]
    pub index: String,

    pub columns: Vec<String>,

    /// Referenced table.
    pub on: String,

    /// Referenced columns.
    pub references: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

impl ForeignKeyCommand {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: String::new(),
            columns: columns.into_iter().map(Into::into).collect(),
            on: String::new(),
            references: Vec::new(),
            on_delete: None,
        }
    }

    pub fn references<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn on(mut self, table: impl Into<String>) -> Self {
        self.on = table.into();
        self
    }

    pub fn on_delete(mut self, action: impl Into<String>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    pub fn named(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }
}

/// A structural command against the blueprint's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Command {
    Create,
    Add {
        columns: Vec<String>,
    },
    Change {
        columns: Vec<String>,
    },
    Primary(IndexCommand),
    Foreign(ForeignKeyCommand),
    Unique(IndexCommand),
    Index(IndexCommand),
    Drop,
    DropIfExists,
    DropAllTables,
    DropColumn {
        columns: Vec<String>,
    },
    DropPrimary {
        index: String,
    },
    DropUnique {
        index: String,
    },
    DropIndex {
        index: String,
    },
    DropForeign {
        index: String,
    },
    Rename {
        to: String,
    },
    RenameColumn {
        from: String,
        to: String,
    },
    TableComment {
        comment: String,
    },
    UpdateEnum {
        column: String,
        allowed: Vec<String>,
    },
    TableExists,
    ColumnExists {
        database: String,
    },
}

impl Command {
    /// The command tag as used in blueprint files.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create => "create",
            Command::Add { .. } => "add",
            Command::Change { .. } => "change",
            Command::Primary(_) => "primary",
            Command::Foreign(_) => "foreign",
            Command::Unique(_) => "unique",
            Command::Index(_) => "index",
            Command::Drop => "drop",
            Command::DropIfExists => "dropIfExists",
            Command::DropAllTables => "dropAllTables",
            Command::DropColumn { .. } => "dropColumn",
            Command::DropPrimary { .. } => "dropPrimary",
            Command::DropUnique { .. } => "dropUnique",
            Command::DropIndex { .. } => "dropIndex",
            Command::DropForeign { .. } => "dropForeign",
            Command::Rename { .. } => "rename",
            Command::RenameColumn { .. } => "renameColumn",
            Command::TableComment { .. } => "tableComment",
            Command::UpdateEnum { .. } => "updateEnum",
            Command::TableExists => "tableExists",
            Command::ColumnExists { .. } => "columnExists",
        }
    }
}

/// Desired column and constraint state for one table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blueprint {
    /// Table name, without table prefix.
    pub table: String,

    /// Table prefix used when generating index names.
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub columns: Vec<ColumnSpec>,

    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Blueprint {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Read a blueprint from a YAML or JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Whether the blueprint creates its table.
    pub fn creating(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::Create))
    }

    /// Columns being added (not flagged as changes).
    pub fn added_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| !c.change)
    }

    /// Columns being modified.
    pub fn changed_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.change)
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The primary key command, if any.
    pub fn primary_command(&self) -> Option<&IndexCommand> {
        self.commands.iter().find_map(|c| match c {
            Command::Primary(p) => Some(p),
            _ => None,
        })
    }

    /// Foreign key commands in declaration order.
    pub fn foreign_commands(&self) -> impl Iterator<Item = &ForeignKeyCommand> {
        self.commands.iter().filter_map(|c| match c {
            Command::Foreign(f) => Some(f),
            _ => None,
        })
    }

    /// Default index name: `<prefix><table>_<columns>_<kind>`, lower-cased.
    pub fn create_index_name(&self, kind: &str, columns: &[String]) -> String {
        format!(
            "{}{}_{}_{}",
            self.prefix,
            self.table,
            columns.join("_"),
            kind
        )
        .to_lowercase()
        .replace(['-', '.'], "_")
    }

    // ===== Column constructors =====

    pub fn add_column(&mut self, column: ColumnSpec) -> &mut ColumnSpec {
        self.columns.push(column);
        let idx = self.columns.len() - 1;
        &mut self.columns[idx]
    }

    /// Auto-incrementing `integer` primary key.
    pub fn increments(&mut self, name: &str) -> &mut ColumnSpec {
        let col = self.integer(name);
        col.auto_increment().not_null();
        col
    }

    /// Auto-incrementing `bigInteger` primary key.
    pub fn big_increments(&mut self, name: &str) -> &mut ColumnSpec {
        let col = self.big_integer(name);
        col.auto_increment().not_null();
        col
    }

    /// `big_increments("id")`.
    pub fn id(&mut self) -> &mut ColumnSpec {
        self.big_increments("id")
    }

    pub fn integer(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Integer))
    }

    pub fn big_integer(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::BigInteger))
    }

    pub fn medium_integer(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::MediumInteger))
    }

    pub fn small_integer(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::SmallInteger))
    }

    pub fn tiny_integer(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::TinyInteger))
    }

    pub fn string(&mut self, name: &str, length: u32) -> &mut ColumnSpec {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::String));
        col.length = Some(length);
        col
    }

    pub fn char(&mut self, name: &str, length: u32) -> &mut ColumnSpec {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::Char));
        col.length = Some(length);
        col
    }

    pub fn nvarchar2(&mut self, name: &str, length: u32) -> &mut ColumnSpec {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::Nvarchar2));
        col.length = Some(length);
        col
    }

    pub fn text(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Text))
    }

    pub fn medium_text(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::MediumText))
    }

    pub fn long_text(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::LongText))
    }

    /// `float`; with `total` set it compiles to `numeric(total[, places])`.
    pub fn float(&mut self, name: &str, total: Option<u32>, places: Option<u32>) -> &mut ColumnSpec {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::Float));
        col.total = total;
        col.places = places;
        col
    }

    /// `double`; with `total` set it compiles to `numeric(total[, places])`.
    pub fn double(&mut self, name: &str, total: Option<u32>, places: Option<u32>) -> &mut ColumnSpec {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::Double));
        col.total = total;
        col.places = places;
        col
    }

    pub fn decimal(&mut self, name: &str, total: u32, places: u32) -> &mut ColumnSpec {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::Decimal));
        col.total = Some(total);
        col.places = Some(places);
        col
    }

    pub fn boolean(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Boolean))
    }

    /// Enum column; the allowed values become a check constraint.
    pub fn enumeration<I, S>(&mut self, name: &str, allowed: I) -> &mut ColumnSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let col = self.add_column(ColumnSpec::new(name, ColumnType::Enum));
        col.allowed = allowed.into_iter().map(Into::into).collect();
        col
    }

    pub fn date(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Date))
    }

    pub fn date_time(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::DateTime))
    }

    pub fn time(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Time))
    }

    pub fn timestamp(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Timestamp))
    }

    pub fn timestamp_tz(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::TimestampTz))
    }

    /// Nullable `created_at` and `updated_at` timestamps.
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable(true);
        self.timestamp("updated_at").nullable(true);
    }

    pub fn binary(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Binary))
    }

    pub fn uuid(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Uuid))
    }

    pub fn ip_address(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::IpAddress))
    }

    pub fn mac_address(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::MacAddress))
    }

    pub fn json(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Json))
    }

    pub fn jsonb(&mut self, name: &str) -> &mut ColumnSpec {
        self.add_column(ColumnSpec::new(name, ColumnType::Jsonb))
    }

    // ===== Command constructors =====

    pub fn create(&mut self) {
        self.commands.push(Command::Create);
    }

    pub fn drop(&mut self) {
        self.commands.push(Command::Drop);
    }

    pub fn drop_if_exists(&mut self) {
        self.commands.push(Command::DropIfExists);
    }

    pub fn drop_all_tables(&mut self) {
        self.commands.push(Command::DropAllTables);
    }

    pub fn drop_column(&mut self, column: &str) {
        self.drop_columns([column]);
    }

    pub fn drop_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.push(Command::DropColumn {
            columns: columns.into_iter().map(Into::into).collect(),
        });
    }

    pub fn primary<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index = self.create_index_name("primary", &columns);
        self.commands
            .push(Command::Primary(IndexCommand::new(index, columns)));
    }

    pub fn unique<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index = self.create_index_name("unique", &columns);
        self.commands
            .push(Command::Unique(IndexCommand::new(index, columns)));
    }

    pub fn index<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index = self.create_index_name("index", &columns);
        self.commands
            .push(Command::Index(IndexCommand::new(index, columns)));
    }

    pub fn foreign(&mut self, mut foreign: ForeignKeyCommand) {
        if foreign.index.is_empty() {
            foreign.index = self.create_index_name("foreign", &foreign.columns);
        }
        self.commands.push(Command::Foreign(foreign));
    }

    pub fn drop_primary(&mut self, index: impl Into<String>) {
        self.commands.push(Command::DropPrimary {
            index: index.into(),
        });
    }

    pub fn drop_unique(&mut self, index: impl Into<String>) {
        self.commands.push(Command::DropUnique {
            index: index.into(),
        });
    }

    pub fn drop_index(&mut self, index: impl Into<String>) {
        self.commands.push(Command::DropIndex {
            index: index.into(),
        });
    }

    pub fn drop_foreign(&mut self, index: impl Into<String>) {
        self.commands.push(Command::DropForeign {
            index: index.into(),
        });
    }

    pub fn rename(&mut self, to: impl Into<String>) {
        self.commands.push(Command::Rename { to: to.into() });
    }

    pub fn rename_column(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.commands.push(Command::RenameColumn {
            from: from.into(),
            to: to.into(),
        });
    }

    pub fn comment(&mut self, comment: impl Into<String>) {
        self.commands.push(Command::TableComment {
            comment: comment.into(),
        });
    }

    pub fn update_enum<I, S>(&mut self, column: &str, allowed: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.push(Command::UpdateEnum {
            column: column.to_string(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        });
    }

    // ===== Implied commands =====

    /// Register the commands the column list implies.
    ///
    /// - `change` and `add` commands are prepended when the table is not being
    ///   created and carries changed/added columns that no existing `change`
    ///   or `add` command lists.
    /// - Fluent `primary`/`unique`/`index` column flags become commands unless
    ///   an equal command is already registered.
    /// - The first auto-increment serial column becomes the primary key when
    ///   no primary command exists (marked `implied`).
    /// - Empty index names are filled in.
    ///
    /// Safe to call again after the blueprint changed: only what is missing
    /// gets registered.
    pub fn resolve_implied_commands(&mut self) -> Result<()> {
        if !self.creating() {
            let changed: Vec<String> = self
                .changed_columns()
                .filter(|c| !self.lists_column(&c.name, |cmd| matches!(cmd, Command::Change { .. })))
                .map(|c| c.name.clone())
                .collect();
            if !changed.is_empty() {
                let at = self.position_after(&["change"]);
                self.commands.insert(at, Command::Change { columns: changed });
            }

            let added: Vec<String> = self
                .added_columns()
                .filter(|c| !self.lists_column(&c.name, |cmd| matches!(cmd, Command::Add { .. })))
                .map(|c| c.name.clone())
                .collect();
            if !added.is_empty() {
                let at = self.position_after(&["change", "add"]);
                self.commands.insert(at, Command::Add { columns: added });
            }
        }

        let mut fluent = Vec::new();
        for col in &self.columns {
            let columns = vec![col.name.clone()];
            if col.primary {
                fluent.push(Command::Primary(IndexCommand::new(
                    self.create_index_name("primary", &columns),
                    columns.clone(),
                )));
            }
            if col.unique {
                fluent.push(Command::Unique(IndexCommand::new(
                    self.create_index_name("unique", &columns),
                    columns.clone(),
                )));
            }
            if col.index {
                fluent.push(Command::Index(IndexCommand::new(
                    self.create_index_name("index", &columns),
                    columns,
                )));
            }
        }
        fluent.retain(|cmd| !self.has_index_command(cmd));
        self.commands.extend(fluent);

        if self.primary_command().is_none() {
            let serial = self
                .columns
                .iter()
                .find(|c| c.auto_increment && c.column_type.is_serial())
                .map(|c| vec![c.name.clone()]);
            if let Some(columns) = serial {
                let mut primary =
                    IndexCommand::new(self.create_index_name("primary", &columns), columns);
                primary.implied = true;
                self.commands.push(Command::Primary(primary));
            }
        }

        let primaries = self
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Primary(_)))
            .count();
        if primaries > 1 {
            return Err(SchemaError::Config(format!(
                "table {} declares {} primary keys",
                self.table, primaries
            )));
        }

        let names: Vec<Option<String>> = self
            .commands
            .iter()
            .map(|c| match c {
                Command::Primary(i) if i.index.is_empty() => {
                    Some(self.create_index_name("primary", &i.columns))
                }
                Command::Unique(i) if i.index.is_empty() => {
                    Some(self.create_index_name("unique", &i.columns))
                }
                Command::Index(i) if i.index.is_empty() => {
                    Some(self.create_index_name("index", &i.columns))
                }
                Command::Foreign(f) if f.index.is_empty() => {
                    Some(self.create_index_name("foreign", &f.columns))
                }
                _ => None,
            })
            .collect();
        for (cmd, name) in self.commands.iter_mut().zip(names) {
            let Some(name) = name else { continue };
            match cmd {
                Command::Primary(i) | Command::Unique(i) | Command::Index(i) => i.index = name,
                Command::Foreign(f) => f.index = name,
                _ => {}
            }
        }

        Ok(())
    }

    /// Whether a command matching `kind` already lists `column`.
    fn lists_column(&self, column: &str, kind: impl Fn(&Command) -> bool) -> bool {
        self.commands.iter().filter(|cmd| kind(cmd)).any(|cmd| match cmd {
            Command::Add { columns } | Command::Change { columns } => {
                columns.iter().any(|c| c.eq_ignore_ascii_case(column))
            }
            _ => false,
        })
    }

    /// Index just past the last command named in `names`, or 0.
    fn position_after(&self, names: &[&str]) -> usize {
        self.commands
            .iter()
            .rposition(|cmd| names.contains(&cmd.name()))
            .map_or(0, |i| i + 1)
    }

    /// Whether an index command of the same kind covers the same columns.
    fn has_index_command(&self, candidate: &Command) -> bool {
        let same_columns = |a: &IndexCommand, b: &IndexCommand| {
            a.columns.len() == b.columns.len()
                && a.columns
                    .iter()
                    .zip(&b.columns)
                    .all(|(x, y)| x.eq_ignore_ascii_case(y))
        };
        self.commands.iter().any(|cmd| match (cmd, candidate) {
            (Command::Primary(a), Command::Primary(b))
            | (Command::Unique(a), Command::Unique(b))
            | (Command::Index(a), Command::Index(b)) => same_columns(a, b),
            _ => false,
        })
    }
}
