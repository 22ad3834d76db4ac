//! Interpretation of driver metadata for existing tables and columns.
//!
//! The driver reports each column as a generic type code, the engine's type
//! name and a few sizes. These functions turn that into the `sql_type` text
//! and [`ColumnDescriptor`] the host works with.

use oxide_adapter_core::ColumnDescriptor;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cast::resolve_type;
use crate::error::{AdapterError, Result};

/// Column size the driver reports for `(max)` types.
pub const MAX_COLUMN_SIZE: i32 = i32::MAX;

/// Schemas hidden from table listings unless explicitly requested.
pub const SYSTEM_SCHEMAS: [&str; 2] = ["sys", "information_schema"];

/// Generic type code reported by the driver for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverType {
    /// 4-byte integer.
    Integer,
    /// Unsigned byte.
    TinyInt,
    /// 2-byte integer.
    SmallInt,
    /// 8-byte integer.
    BigInt,
    /// Single bit.
    Bit,
    /// Single precision float.
    Real,
    /// Double precision float (`float`).
    Double,
    /// Calendar date.
    Date,
    /// Date and time (`datetime`, `datetime2`, `smalldatetime`).
    Timestamp,
    /// Time of day.
    Time,
    /// `numeric`.
    Numeric,
    /// `decimal`, `money`, `smallmoney`.
    Decimal,
    /// Fixed-length character data, also `uniqueidentifier`.
    Char,
    /// Fixed-length national character data.
    NChar,
    /// Variable-length character data.
    VarChar,
    /// Variable-length national character data.
    NVarChar,
    /// Fixed-length binary data.
    Binary,
    /// Variable-length binary data.
    VarBinary,
    /// `image`.
    LongVarBinary,
    /// `text`.
    LongVarChar,
    /// `ntext`, `xml`.
    LongNVarChar,
    /// Anything else.
    Other,
}

/// Driver metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Engine type name (`nvarchar`, `int identity`).
    pub type_name: String,
    /// Generic type code.
    pub driver_type: DriverType,
    /// Precision for numerics, length for character and binary types.
    #[serde(default)]
    pub column_size: i32,
    /// Scale for numerics, fractional second digits for temporal types.
    #[serde(default)]
    pub decimal_digits: i32,
    /// Whether the column accepts NULL.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default literal.
    #[serde(default)]
    pub default: Option<String>,
    /// Whether the column is an identity column.
    #[serde(default)]
    pub identity: bool,
    /// Whether the column belongs to the primary key.
    #[serde(default)]
    pub primary_key: bool,
}

const fn default_nullable() -> bool {
    true
}

impl ColumnMetadata {
    /// Creates metadata with zero sizes for a nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, driver_type: DriverType) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            driver_type,
            column_size: 0,
            decimal_digits: 0,
            nullable: true,
            default: None,
            identity: false,
            primary_key: false,
        }
    }

    /// Sets column size and decimal digits.
    #[must_use]
    pub const fn sizes(mut self, column_size: i32, decimal_digits: i32) -> Self {
        self.column_size = column_size;
        self.decimal_digits = decimal_digits;
        self
    }

    /// Type name without the ` identity` suffix the driver appends.
    fn base_type_name(&self) -> &str {
        let name = self.type_name.trim();
        name.strip_suffix(" identity").unwrap_or(name)
    }

    fn is_identity(&self) -> bool {
        self.identity || self.type_name.trim().ends_with(" identity")
    }
}

fn with_precision(name: &str, precision: i32) -> String {
    if precision < 0 {
        name.to_string()
    } else {
        format!("{name}({precision})")
    }
}

fn with_precision_and_scale(name: &str, precision: i32, scale: i32) -> String {
    if precision <= 0 {
        name.to_string()
    } else if scale >= 0 {
        format!("{name}({precision},{scale})")
    } else {
        format!("{name}({precision})")
    }
}

/// Builds the `sql_type` text of a column from its driver metadata.
#[must_use]
pub fn format_sql_type(metadata: &ColumnMetadata) -> String {
    let name = metadata.base_type_name();
    let size = metadata.column_size;
    let digits = metadata.decimal_digits;

    match metadata.driver_type {
        DriverType::Integer
        | DriverType::TinyInt
        | DriverType::SmallInt
        | DriverType::BigInt
        | DriverType::Bit
        | DriverType::Real
        | DriverType::Double
        | DriverType::Date
        | DriverType::LongVarBinary
        | DriverType::LongVarChar
        | DriverType::LongNVarChar => name.to_string(),
        // datetime2 and time report their fractional precision as scale
        DriverType::Timestamp if name == "datetime2" => with_precision(name, digits),
        DriverType::Timestamp => name.to_string(),
        DriverType::Time => with_precision(name, digits),
        DriverType::Numeric | DriverType::Decimal if name == "money" || name == "smallmoney" => {
            name.to_string()
        }
        DriverType::Numeric | DriverType::Decimal => with_precision_and_scale(name, size, digits),
        DriverType::Char if name == "uniqueidentifier" => name.to_string(),
        DriverType::Char | DriverType::NChar => with_precision(name, size),
        DriverType::VarChar | DriverType::NVarChar | DriverType::Binary | DriverType::VarBinary
            if size == MAX_COLUMN_SIZE =>
        {
            format!("{name}(max)")
        }
        DriverType::VarChar | DriverType::NVarChar | DriverType::Binary | DriverType::VarBinary => {
            with_precision(name, size)
        }
        DriverType::Other => with_precision_and_scale(name, size, digits),
    }
}

/// Builds the host column descriptor from driver metadata.
///
/// Exact numerics carry precision and scale, with the money types always
/// reported as `money(19,4)` and `smallmoney(10,4)`. Character and binary
/// types carry their length as limit, including the `(max)` sentinel.
///
/// # Errors
///
/// Returns [`AdapterError::Introspection`] when the column has no name.
pub fn column_from_metadata(metadata: &ColumnMetadata) -> Result<ColumnDescriptor> {
    if metadata.name.trim().is_empty() {
        return Err(AdapterError::Introspection(format!(
            "column of type {} has no name",
            metadata.type_name
        )));
    }

    let mut descriptor = ColumnDescriptor::new(metadata.name.clone(), format_sql_type(metadata));
    descriptor.null = metadata.nullable;
    descriptor.default.clone_from(&metadata.default);
    descriptor.identity = metadata.is_identity();
    descriptor.primary_key = metadata.primary_key;

    match metadata.driver_type {
        DriverType::Numeric | DriverType::Decimal => {
            let precision = u8::try_from(metadata.column_size).ok();
            let scale = u8::try_from(metadata.decimal_digits).ok();
            if let Ok(resolved) = resolve_type(metadata.base_type_name(), precision, scale) {
                if resolved.native().has_fixed_format() {
                    descriptor.sql_type = resolved.described_sql_type();
                }
                descriptor.precision = resolved.precision();
                descriptor.scale = resolved.scale();
            } else {
                descriptor.precision = precision;
                descriptor.scale = scale;
            }
        }
        DriverType::Timestamp | DriverType::Time => {
            descriptor.precision = u8::try_from(metadata.decimal_digits).ok();
        }
        DriverType::Char
        | DriverType::NChar
        | DriverType::VarChar
        | DriverType::NVarChar
        | DriverType::Binary
        | DriverType::VarBinary
        | DriverType::LongVarChar
        | DriverType::LongNVarChar
        | DriverType::LongVarBinary => {
            descriptor.limit = u32::try_from(metadata.column_size).ok().filter(|l| *l > 0);
        }
        _ => {}
    }

    trace!(column = %descriptor.name, sql_type = %descriptor.sql_type, "Described column");
    Ok(descriptor)
}

/// One row of the driver's table listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Owning schema.
    #[serde(default)]
    pub schema: Option<String>,
    /// Table name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Returns the names of user tables in a driver table listing.
///
/// Objects in `sys` and `information_schema` are skipped unless the listing
/// was requested for an explicit schema pattern.
///
/// # Errors
///
/// Returns [`AdapterError::Introspection`] when a row has no table name,
/// which the driver produces when metadata is read while plan display
/// (`SET SHOWPLAN_TEXT ON`) is active.
pub fn user_tables(rows: &[TableRow], schema_pattern: Option<&str>) -> Result<Vec<String>> {
    let mut tables = Vec::new();
    for row in rows {
        let schema = row.schema.as_deref().map(str::to_ascii_lowercase);
        if schema_pattern.is_none()
            && schema
                .as_deref()
                .is_some_and(|s| SYSTEM_SCHEMAS.contains(&s))
        {
            continue;
        }
        let Some(ref name) = row.name else {
            return Err(AdapterError::Introspection(format!(
                "got null name while listing tables (schema pattern: {})",
                schema_pattern.unwrap_or("<none>")
            )));
        };
        tables.push(name.clone());
    }
    debug!(count = tables.len(), "Listed user tables");
    Ok(tables)
}
