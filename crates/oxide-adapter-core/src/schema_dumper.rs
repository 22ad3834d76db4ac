//! Rules for turning existing columns back into schema declarations.

use serde::Serialize;

use crate::schema::ColumnDescriptor;

/// Declaration of a table's primary key as emitted by a schema dump.
///
/// `None` fields are omitted: a key that uses the host's implicit default
/// form dumps with neither type nor default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKeyDump {
    /// Primary key column name.
    pub name: String,
    /// Explicit type, when the key deviates from the implicit default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<String>,
    /// Whether `default: nil` must be written out.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub explicit_default_null: bool,
}

/// Dump-time decisions about columns.
pub trait SchemaDumper {
    /// Whether `base_type` is the type of the implicit default primary key.
    ///
    /// The host declares default keys as `bigint`; any other key type has to
    /// be dumped explicitly to survive a reload.
    fn is_primary_key_type(&self, base_type: &str) -> bool {
        base_type == "bigint"
    }

    /// Limit written for `column`, or `None` when it must be omitted.
    fn schema_limit(&self, column: &ColumnDescriptor) -> Option<u32> {
        column.limit
    }

    /// Whether `column` is a primary key in the host's implicit default form.
    fn is_default_primary_key(&self, column: &ColumnDescriptor) -> bool {
        column.primary_key && self.is_primary_key_type(&column.base_type())
    }

    /// Whether a primary key must be dumped with an explicit `NULL` default.
    fn explicit_primary_key_default(&self, _column: &ColumnDescriptor) -> bool {
        false
    }

    /// Builds the primary key declaration for `column`.
    fn primary_key_dump(&self, column: &ColumnDescriptor) -> PrimaryKeyDump {
        if self.is_default_primary_key(column) {
            return PrimaryKeyDump {
                name: column.name.clone(),
                sql_type: None,
                explicit_default_null: false,
            };
        }
        PrimaryKeyDump {
            name: column.name.clone(),
            sql_type: Some(column.base_type()),
            explicit_default_null: self.explicit_primary_key_default(column),
        }
    }
}
