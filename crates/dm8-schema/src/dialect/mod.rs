//! SQL dialect rules the grammar composes with.
//!
//! - [`typemap`]: abstract type → DM8 column type, and the implicit-default policy
//! - [`Dm8Dialect`]: the DM8 implementation of [`Dialect`](crate::core::Dialect)

pub mod typemap;

use crate::core::identifier::IdentifierPolicy;
use crate::core::schema::{ColumnSpec, DefaultValue};
use crate::core::traits::Dialect;
use crate::error::Result;

pub use typemap::{compute_implicit_default, map_abstract_type, normalize_type};

/// DM8 dialect implementation.
///
/// Identifiers are emitted bare unless reserved; string lengths are optionally
/// counted in characters.
#[derive(Debug, Clone)]
pub struct Dm8Dialect {
    length_in_char: bool,
    identifiers: IdentifierPolicy,
}

impl Dm8Dialect {
    /// Create a new DM8 dialect instance.
    pub fn new(length_in_char: bool) -> Self {
        Self {
            length_in_char,
            identifiers: IdentifierPolicy::dm8(),
        }
    }

    /// Replace the reserved-word policy.
    pub fn with_identifier_policy(mut self, identifiers: IdentifierPolicy) -> Self {
        self.identifiers = identifiers;
        self
    }

    pub fn length_in_char(&self) -> bool {
        self.length_in_char
    }

    pub fn set_length_in_char(&mut self, length_in_char: bool) {
        self.length_in_char = length_in_char;
    }

    pub fn identifiers(&self) -> &IdentifierPolicy {
        &self.identifiers
    }
}

impl Default for Dm8Dialect {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Dialect for Dm8Dialect {
    fn name(&self) -> &str {
        "dm8"
    }

    fn quote_ident(&self, name: &str) -> String {
        self.identifiers.wrap_value(name)
    }

    fn map_type(&self, column: &ColumnSpec) -> Result<String> {
        map_abstract_type(column, self.length_in_char)
    }

    fn implicit_default(&self, type_sql: &str) -> Option<DefaultValue> {
        compute_implicit_default(type_sql)
    }
}
