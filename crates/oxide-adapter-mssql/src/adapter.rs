//! The SQL Server adapter type and its quoting rules.

use oxide_adapter_core::{DefaultValue, Quoting};

use crate::limits::CapacityLimits;

/// SQL Server dialect adapter.
///
/// Holds nothing but its capacity limits, so it is `Copy` and can be shared
/// freely between threads. The dialect behavior lives in its implementations
/// of the core traits ([`Quoting`], [`oxide_adapter_core::SchemaCreation`],
/// [`oxide_adapter_core::SchemaDumper`],
/// [`oxide_adapter_core::DatabaseStatements`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MssqlAdapter {
    limits: CapacityLimits,
}

impl MssqlAdapter {
    /// Adapter name reported to the host.
    pub const NAME: &'static str = "MSSQL";

    /// Creates an adapter that shapes statements against `limits`.
    #[must_use]
    pub const fn new(limits: CapacityLimits) -> Self {
        Self { limits }
    }

    /// Returns the capacity limits.
    #[must_use]
    pub const fn limits(&self) -> &CapacityLimits {
        &self.limits
    }
}

/// Whether a column type stores national (UTF-16) character data.
fn is_national_character(sql_type: &str) -> bool {
    let lower = sql_type.trim().to_ascii_lowercase();
    ["nchar", "nvarchar", "ntext"]
        .iter()
        .any(|t| lower == *t || lower.starts_with(&format!("{t}(")))
}

impl Quoting for MssqlAdapter {
    fn identifier_delimiters(&self) -> (char, char) {
        ('[', ']')
    }

    fn quote_default_expression(&self, value: &DefaultValue, sql_type: Option<&str>) -> String {
        match value {
            DefaultValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
            DefaultValue::String(s) if sql_type.is_some_and(is_national_character) => {
                format!("N{}", self.quote_string(s))
            }
            DefaultValue::String(s) => self.quote_string(s),
            other => other.to_sql(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_quoting() {
        let adapter = MssqlAdapter::default();
        assert_eq!(adapter.quote_identifier("order"), "[order]");
        assert_eq!(adapter.quote_identifier("odd]name"), "[odd]]name]");
        assert_eq!(adapter.quote_table_name("dbo.users"), "[dbo].[users]");
        assert_eq!(adapter.quote_column_name("#tmp"), "[#tmp]");
    }

    #[test]
    fn test_default_expression_quoting() {
        let adapter = MssqlAdapter::default();
        assert_eq!(adapter.quote_default_expression(&DefaultValue::Bool(true), Some("bit")), "1");
        assert_eq!(
            adapter.quote_default_expression(&DefaultValue::String("héllo".to_string()), Some("nvarchar(20)")),
            "N'héllo'"
        );
        assert_eq!(
            adapter.quote_default_expression(&DefaultValue::String("it's".to_string()), Some("varchar(20)")),
            "'it''s'"
        );
        assert_eq!(
            adapter.quote_default_expression(&DefaultValue::Float(9.11), Some("decimal(15,2)")),
            "9.11"
        );
        assert_eq!(
            adapter.quote_default_expression(&DefaultValue::Expression("GETDATE()".to_string()), None),
            "GETDATE()"
        );
    }

    #[test]
    fn test_adapter_is_copy_and_thread_safe() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<MssqlAdapter>();
        assert_eq!(MssqlAdapter::default().limits(), &CapacityLimits::default());
    }
}
