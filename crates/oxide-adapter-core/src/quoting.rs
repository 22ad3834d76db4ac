//! Identifier and literal quoting.

use crate::schema::DefaultValue;

/// Quoting rules of a dialect.
///
/// The defaults follow ANSI SQL: double-quoted identifiers with embedded
/// quotes doubled, and single-quoted string literals.
pub trait Quoting {
    /// Returns the opening and closing identifier delimiters.
    fn identifier_delimiters(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quotes a single identifier, escaping the closing delimiter.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_delimiters();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Quotes a possibly schema-qualified table name (`schema.table`).
    fn quote_table_name(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a column name.
    fn quote_column_name(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    /// Quotes a string literal.
    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders a default value for a column of the given type.
    fn quote_default_expression(&self, value: &DefaultValue, _sql_type: Option<&str>) -> String {
        match value {
            DefaultValue::String(s) => self.quote_string(s),
            other => other.to_sql(),
        }
    }
}
