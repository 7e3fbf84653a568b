//! DM8 type and implicit-default policy.
//!
//! [`map_abstract_type`] turns an abstract column into DM8 column syntax.
//! [`compute_implicit_default`] picks the value injected into NOT NULL columns
//! that have no default when strict mode is off, so inserts that omit the
//! column still succeed on servers running with strict SQL checks.
//!
//! DM8 stores `date`, `dateTime` and `time` in a single `date` type. That
//! collapse is lossy on purpose: it is the storage DM8 offers.

use tracing::debug;

use crate::core::schema::{ColumnSpec, ColumnType, DefaultValue};
use crate::error::{Result, SchemaError};

/// String length used when a string-family column carries none.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// `varchar2(n)` or `varchar2(n char)` when lengths are counted in characters.
pub fn wrap_char_type(type_name: &str, length: u32, length_in_char: bool) -> String {
    if length_in_char {
        format!("{}({} char)", type_name, length)
    } else {
        format!("{}({})", type_name, length)
    }
}

/// `numeric(total[, places])` for float/double with precision, else the bare keyword.
fn float_type(keyword: &str, column: &ColumnSpec) -> String {
    match (column.total, column.places) {
        (Some(total), Some(places)) if total > 0 && places > 0 => {
            format!("numeric({}, {})", total, places)
        }
        (Some(total), _) if total > 0 => format!("numeric({})", total),
        _ => keyword.to_string(),
    }
}

/// Map an abstract column to its DM8 column type.
///
/// # Errors
///
/// `decimal` without both `total` and `places` is rejected.
pub fn map_abstract_type(column: &ColumnSpec, length_in_char: bool) -> Result<String> {
    let length = column.length.unwrap_or(DEFAULT_STRING_LENGTH);

    let sql = match column.column_type {
        ColumnType::Char | ColumnType::String | ColumnType::Enum => {
            wrap_char_type("varchar2", length, length_in_char)
        }
        ColumnType::Nvarchar2 => wrap_char_type("nvarchar2", length, length_in_char),
        ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => "text".to_string(),
        ColumnType::BigInteger => "bigint".to_string(),
        ColumnType::Integer | ColumnType::MediumInteger => "int".to_string(),
        ColumnType::SmallInteger => "smallint".to_string(),
        ColumnType::TinyInteger | ColumnType::Boolean => "tinyint".to_string(),
        ColumnType::Float => float_type("float", column),
        ColumnType::Double => float_type("double", column),
        ColumnType::Decimal => match (column.total, column.places) {
            (Some(total), Some(places)) => format!("decimal({}, {})", total, places),
            _ => {
                return Err(SchemaError::invalid_column(
                    &column.name,
                    "decimal requires both total and places",
                ))
            }
        },
        ColumnType::Date | ColumnType::DateTime | ColumnType::Time => {
            if column.column_type != ColumnType::Date {
                debug!(
                    "Column {}: {} stored as DM8 date",
                    column.name, column.column_type
                );
            }
            "date".to_string()
        }
        ColumnType::Timestamp => "timestamp".to_string(),
        ColumnType::TimestampTz => "timestamp with time zone".to_string(),
        ColumnType::Binary => "blob".to_string(),
        ColumnType::Uuid => wrap_char_type("varchar2", 36, length_in_char),
        ColumnType::IpAddress => wrap_char_type("varchar2", 45, length_in_char),
        ColumnType::MacAddress => wrap_char_type("varchar2", 17, length_in_char),
        ColumnType::Json => "json".to_string(),
        ColumnType::Jsonb => "jsonb".to_string(),
    };

    Ok(sql)
}

const STRING_TYPES: &[&str] = &[
    "string",
    "text",
    "longvarchar",
    "char",
    "varchar",
    "varchar2",
    "nvarchar2",
    "nvarchar",
];

const JSON_TYPES: &[&str] = &["json", "jsonb"];

const NUMERIC_TYPES: &[&str] = &[
    "integer",
    "int",
    "bigint",
    "smallint",
    "tinyint",
    "float",
    "double",
    "decimal",
    "numeric",
    "dec",
    "number",
    "real",
    "double precision",
    "boolean",
    "bit",
    "byte",
];

const DATETIME_TYPES: &[&str] = &[
    "datetime",
    "timestamp",
    "timestamp time zone",
    "timestamp with timezone",
    "timestamp with local time zone",
];

const BINARY_TYPES: &[&str] = &["binary", "varbinary", "blob", "clob", "raw"];

const EPOCH_DATETIME: &str = "1970-01-01 00:00:00";

/// Strip parameters and normalize case: `Decimal(10, 2)` -> `decimal`.
pub fn normalize_type(type_sql: &str) -> String {
    type_sql
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Implicit default for a NOT NULL column of the given mapped type.
///
/// | family | value |
/// |---|---|
/// | string | `''` |
/// | json | `'{}'` |
/// | numeric, boolean, byte | `0` |
/// | date/time | epoch sentinel |
/// | binary/lob | none |
/// | anything else | `''` |
pub fn compute_implicit_default(type_sql: &str) -> Option<DefaultValue> {
    let normalized = normalize_type(type_sql);
    let ty = normalized.as_str();

    if STRING_TYPES.contains(&ty) {
        return Some(DefaultValue::Text(String::new()));
    }

    if JSON_TYPES.contains(&ty) {
        return Some(DefaultValue::Text("{}".to_string()));
    }

    if NUMERIC_TYPES.contains(&ty) {
        return Some(DefaultValue::Int(0));
    }

    if DATETIME_TYPES.contains(&ty) {
        return Some(DefaultValue::Text(EPOCH_DATETIME.to_string()));
    }
    match ty {
        "date" => return Some(DefaultValue::Text("1970-01-01".to_string())),
        "time" => return Some(DefaultValue::Text("00:00:00".to_string())),
        "year" => return Some(DefaultValue::Text("1970".to_string())),
        _ => {}
    }
    if ty.contains("time") || ty.contains("date") {
        return Some(DefaultValue::Text(EPOCH_DATETIME.to_string()));
    }

    if BINARY_TYPES.contains(&ty) {
        return None;
    }

    Some(DefaultValue::Text(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(ty: ColumnType) -> ColumnSpec {
        ColumnSpec::new("c", ty)
    }

    fn numeric(ty: ColumnType, total: Option<u32>, places: Option<u32>) -> ColumnSpec {
        let mut c = col(ty);
        c.total = total;
        c.places = places;
        c
    }

    #[test]
    fn test_string_family() {
        let mut c = col(ColumnType::String);
        c.length = Some(100);
        assert_eq!(map_abstract_type(&c, false).unwrap(), "varchar2(100)");
        assert_eq!(map_abstract_type(&c, true).unwrap(), "varchar2(100 char)");

        let c = col(ColumnType::Char);
        assert_eq!(map_abstract_type(&c, false).unwrap(), "varchar2(255)");
    }

    #[test]
    fn test_text_family_collapses() {
        for ty in [ColumnType::Text, ColumnType::MediumText, ColumnType::LongText] {
            assert_eq!(map_abstract_type(&col(ty), true).unwrap(), "text");
        }
    }

    #[test]
    fn test_integer_family() {
        assert_eq!(map_abstract_type(&col(ColumnType::BigInteger), false).unwrap(), "bigint");
        assert_eq!(map_abstract_type(&col(ColumnType::Integer), false).unwrap(), "int");
        assert_eq!(map_abstract_type(&col(ColumnType::MediumInteger), false).unwrap(), "int");
        assert_eq!(map_abstract_type(&col(ColumnType::SmallInteger), false).unwrap(), "smallint");
        assert_eq!(map_abstract_type(&col(ColumnType::TinyInteger), false).unwrap(), "tinyint");
        assert_eq!(map_abstract_type(&col(ColumnType::Boolean), false).unwrap(), "tinyint");
    }

    #[test]
    fn test_float_and_double() {
        for (ty, kw) in [(ColumnType::Float, "float"), (ColumnType::Double, "double")] {
            assert_eq!(map_abstract_type(&numeric(ty, None, None), false).unwrap(), kw);
            assert_eq!(
                map_abstract_type(&numeric(ty, Some(8), None), false).unwrap(),
                "numeric(8)"
            );
            assert_eq!(
                map_abstract_type(&numeric(ty, Some(8), Some(2)), false).unwrap(),
                "numeric(8, 2)"
            );
        }
    }

    #[test]
    fn test_decimal() {
        for (total, places) in [(8, 2), (10, 0), (38, 38), (1, 1)] {
            let c = numeric(ColumnType::Decimal, Some(total), Some(places));
            assert_eq!(
                map_abstract_type(&c, false).unwrap(),
                format!("decimal({}, {})", total, places)
            );
        }
    }

    #[test]
    fn test_decimal_requires_total_and_places() {
        let c = numeric(ColumnType::Decimal, Some(8), None);
        let err = map_abstract_type(&c, false).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidColumn { .. }));
    }

    #[test]
    fn test_enum_is_sized_varchar2() {
        let c = col(ColumnType::Enum);
        assert_eq!(map_abstract_type(&c, false).unwrap(), "varchar2(255)");
        let mut c = col(ColumnType::Enum);
        c.length = Some(20);
        assert_eq!(map_abstract_type(&c, true).unwrap(), "varchar2(20 char)");
    }

    #[test]
    fn test_date_time_family() {
        assert_eq!(map_abstract_type(&col(ColumnType::Date), false).unwrap(), "date");
        assert_eq!(map_abstract_type(&col(ColumnType::DateTime), false).unwrap(), "date");
        assert_eq!(map_abstract_type(&col(ColumnType::Time), false).unwrap(), "date");
        assert_eq!(map_abstract_type(&col(ColumnType::Timestamp), false).unwrap(), "timestamp");
        assert_eq!(
            map_abstract_type(&col(ColumnType::TimestampTz), false).unwrap(),
            "timestamp with time zone"
        );
    }

    #[test]
    fn test_fixed_size_strings_and_misc() {
        assert_eq!(map_abstract_type(&col(ColumnType::Uuid), false).unwrap(), "varchar2(36)");
        assert_eq!(map_abstract_type(&col(ColumnType::IpAddress), false).unwrap(), "varchar2(45)");
        assert_eq!(
            map_abstract_type(&col(ColumnType::MacAddress), true).unwrap(),
            "varchar2(17 char)"
        );
        assert_eq!(map_abstract_type(&col(ColumnType::Binary), false).unwrap(), "blob");
        assert_eq!(map_abstract_type(&col(ColumnType::Json), false).unwrap(), "json");
        assert_eq!(map_abstract_type(&col(ColumnType::Jsonb), false).unwrap(), "jsonb");
    }

    #[test]
    fn test_every_type_has_a_mapping() {
        for ty in ColumnType::ALL {
            let mut c = col(ty);
            c.total = Some(10);
            c.places = Some(2);
            assert!(map_abstract_type(&c, false).is_ok(), "no mapping for {}", ty);
        }
    }

    // =========================================================================
    // Implicit default policy
    // =========================================================================

    #[test]
    fn test_normalize_type() {
        assert_eq!(normalize_type("Decimal(10, 2)"), "decimal");
        assert_eq!(normalize_type("varchar2(255 char)"), "varchar2");
        assert_eq!(normalize_type(" TIMESTAMP "), "timestamp");
    }

    #[test]
    fn test_string_defaults() {
        assert_eq!(compute_implicit_default("varchar2(255)"), Some(DefaultValue::Text(String::new())));
        assert_eq!(compute_implicit_default("text"), Some(DefaultValue::Text(String::new())));
        assert_eq!(compute_implicit_default("nvarchar2(10 char)"), Some(DefaultValue::Text(String::new())));
    }

    #[test]
    fn test_json_defaults() {
        assert_eq!(compute_implicit_default("json"), Some(DefaultValue::Text("{}".into())));
        assert_eq!(compute_implicit_default("jsonb"), Some(DefaultValue::Text("{}".into())));
    }

    #[test]
    fn test_numeric_defaults() {
        for ty in ["int", "bigint", "tinyint", "decimal(8, 2)", "numeric(8)", "float", "double"] {
            assert_eq!(compute_implicit_default(ty), Some(DefaultValue::Int(0)), "{}", ty);
        }
    }

    #[test]
    fn test_datetime_defaults() {
        assert_eq!(compute_implicit_default("date"), Some(DefaultValue::Text("1970-01-01".into())));
        assert_eq!(compute_implicit_default("time"), Some(DefaultValue::Text("00:00:00".into())));
        assert_eq!(compute_implicit_default("year"), Some(DefaultValue::Text("1970".into())));
        assert_eq!(
            compute_implicit_default("timestamp"),
            Some(DefaultValue::Text("1970-01-01 00:00:00".into()))
        );
        // Unlisted names containing "time"/"date" fall back to the epoch datetime.
        assert_eq!(
            compute_implicit_default("timestamp with time zone"),
            Some(DefaultValue::Text("1970-01-01 00:00:00".into()))
        );
        assert_eq!(
            compute_implicit_default("smalldatetime"),
            Some(DefaultValue::Text("1970-01-01 00:00:00".into()))
        );
    }

    #[test]
    fn test_binary_has_no_default() {
        for ty in ["blob", "clob", "raw", "binary", "varbinary"] {
            assert_eq!(compute_implicit_default(ty), None, "{}", ty);
        }
    }

    #[test]
    fn test_unknown_type_defaults_to_empty_string() {
        assert_eq!(compute_implicit_default("geometry"), Some(DefaultValue::Text(String::new())));
    }

    #[test]
    fn test_implicit_default_is_pure() {
        for ty in ["varchar2(10)", "json", "int", "date", "blob", "geometry"] {
            assert_eq!(compute_implicit_default(ty), compute_implicit_default(ty));
        }
    }
}
