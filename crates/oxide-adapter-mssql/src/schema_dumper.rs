//! Schema dump rules for SQL Server columns.

use oxide_adapter_core::{ColumnDescriptor, PrimaryKeyDump, SchemaDumper};

use crate::adapter::MssqlAdapter;
use crate::cast::resolve_type;

/// Types whose length is not user-configurable and never dumped.
pub const NO_LIMIT_TYPES: [&str; 5] = [
    "text",
    "ntext",
    "varchar(max)",
    "nvarchar(max)",
    "varbinary(max)",
];

fn is_unbounded(sql_type: &str) -> bool {
    let normalized: String = sql_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    NO_LIMIT_TYPES.contains(&normalized.as_str())
}

impl SchemaDumper for MssqlAdapter {
    fn schema_limit(&self, column: &ColumnDescriptor) -> Option<u32> {
        if is_unbounded(&column.sql_type) {
            None
        } else {
            column.limit
        }
    }

    /// Only `bigint` identity keys match the implicit primary key declaration.
    fn is_default_primary_key(&self, column: &ColumnDescriptor) -> bool {
        column.primary_key && self.is_primary_key_type(&column.base_type()) && column.identity
    }

    fn explicit_primary_key_default(&self, column: &ColumnDescriptor) -> bool {
        !column.identity
    }

    fn primary_key_dump(&self, column: &ColumnDescriptor) -> PrimaryKeyDump {
        if self.is_default_primary_key(column) {
            return PrimaryKeyDump {
                name: column.name.clone(),
                sql_type: None,
                explicit_default_null: false,
            };
        }
        let sql_type = resolve_type(&column.sql_type, None, None)
            .map_or_else(|_| column.base_type(), |resolved| resolved.kind().as_str().to_string());
        PrimaryKeyDump {
            name: column.name.clone(),
            sql_type: Some(sql_type),
            explicit_default_null: self.explicit_primary_key_default(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(sql_type: &str, limit: Option<u32>) -> ColumnDescriptor {
        let mut column = ColumnDescriptor::new("c", sql_type);
        column.limit = limit;
        column
    }

    fn key(sql_type: &str, identity: bool) -> ColumnDescriptor {
        let mut column = ColumnDescriptor::new("id", sql_type);
        column.primary_key = true;
        column.identity = identity;
        column.null = false;
        column
    }

    #[test]
    fn test_schema_limit_suppressed_for_unbounded_types() {
        let adapter = MssqlAdapter::default();
        assert_eq!(adapter.schema_limit(&column("varchar(max)", Some(2_147_483_647))), None);
        assert_eq!(adapter.schema_limit(&column("NVARCHAR(MAX)", Some(1_073_741_823))), None);
        assert_eq!(adapter.schema_limit(&column("varbinary( max )", Some(1))), None);
        assert_eq!(adapter.schema_limit(&column("text", Some(2_147_483_647))), None);
        assert_eq!(adapter.schema_limit(&column("ntext", Some(1_073_741_823))), None);
        assert_eq!(adapter.schema_limit(&column("varchar(50)", Some(50))), Some(50));
        assert_eq!(adapter.schema_limit(&column("nchar(10)", Some(10))), Some(10));
    }

    #[test]
    fn test_default_primary_key_requires_identity() {
        let adapter = MssqlAdapter::default();
        assert!(adapter.is_default_primary_key(&key("bigint", true)));
        assert!(!adapter.is_default_primary_key(&key("bigint", false)));
        assert!(!adapter.is_default_primary_key(&key("int", true)));
        assert!(!adapter.is_default_primary_key(&key("uniqueidentifier", true)));
    }

    #[test]
    fn test_explicit_default_for_non_identity_keys() {
        let adapter = MssqlAdapter::default();
        assert!(adapter.explicit_primary_key_default(&key("int", false)));
        assert!(!adapter.explicit_primary_key_default(&key("int", true)));
    }

    #[test]
    fn test_primary_key_dump() {
        let adapter = MssqlAdapter::default();
        assert_eq!(
            adapter.primary_key_dump(&key("int", false)),
            PrimaryKeyDump {
                name: "id".to_string(),
                sql_type: Some("integer".to_string()),
                explicit_default_null: true,
            }
        );
        assert_eq!(
            adapter.primary_key_dump(&key("bigint", true)),
            PrimaryKeyDump {
                name: "id".to_string(),
                sql_type: None,
                explicit_default_null: false,
            }
        );
        assert_eq!(
            adapter.primary_key_dump(&key("int", true)),
            PrimaryKeyDump {
                name: "id".to_string(),
                sql_type: Some("integer".to_string()),
                explicit_default_null: false,
            }
        );
        assert_eq!(
            adapter.primary_key_dump(&key("uniqueidentifier", false)).sql_type.as_deref(),
            Some("uniqueidentifier")
        );
    }
}
