//! Schema description types shared between the host layer and dialects.
//!
//! Definitions ([`TableDefinition`], [`ColumnDefinition`]) describe what the
//! host wants to create; descriptors ([`ColumnDescriptor`]) describe what
//! already exists and are read-only for dialects.

use serde::{Deserialize, Serialize};

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// Raw SQL expression (e.g., `GETDATE()`).
    Expression(String),
}

impl DefaultValue {
    /// Returns the generic SQL representation of this default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (forbid the change while dependent rows exist).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the standard SQL keyword for this action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// The change a referential action reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialEvent {
    /// `ON DELETE`
    Delete,
    /// `ON UPDATE`
    Update,
}

impl ReferentialEvent {
    /// Returns the SQL keyword following `ON`.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
        }
    }
}

/// A column to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Native type name, optionally with its arguments (`decimal(15,2)`).
    pub sql_type: String,
    /// Length for character/binary types, appended when `sql_type` has none.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Precision for exact numerics, appended when `sql_type` has none.
    #[serde(default)]
    pub precision: Option<u8>,
    /// Scale for exact numerics.
    #[serde(default)]
    pub scale: Option<u8>,
    /// Default value, if one was requested.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Explicit nullability; `None` leaves the engine default.
    #[serde(default)]
    pub null: Option<bool>,
    /// Whether the column is declared inline as the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether values are generated by the engine on insert.
    #[serde(default)]
    pub identity: bool,
}

impl ColumnDefinition {
    /// Creates a nullable column without default.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            limit: None,
            precision: None,
            scale: None,
            default: None,
            null: None,
            primary_key: false,
            identity: false,
        }
    }

    /// Sets the length.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets precision and scale.
    #[must_use]
    pub const fn precision(mut self, precision: u8, scale: Option<u8>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.null = Some(false);
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as engine-generated.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Returns the type text with limit or precision/scale appended when
    /// the declared type carries no arguments of its own.
    #[must_use]
    pub fn full_sql_type(&self) -> String {
        if self.sql_type.contains('(') {
            return self.sql_type.clone();
        }
        match (self.limit, self.precision, self.scale) {
            (Some(limit), _, _) => format!("{}({limit})", self.sql_type),
            (None, Some(p), Some(s)) => format!("{}({p},{s})", self.sql_type),
            (None, Some(p), None) => format!("{}({p})", self.sql_type),
            (None, None, _) => self.sql_type.clone(),
        }
    }
}

/// Options consulted when rendering the trailing clauses of a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOptions {
    /// Requested default, if any.
    pub default: Option<DefaultValue>,
    /// Explicit nullability.
    pub null: Option<bool>,
    /// Engine-generated column.
    pub identity: bool,
    /// Inline primary key.
    pub primary_key: bool,
    /// Type of the column the options belong to, for default quoting.
    pub sql_type: Option<String>,
}

impl ColumnOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets explicit nullability.
    #[must_use]
    pub const fn null(mut self, null: bool) -> Self {
        self.null = Some(null);
        self
    }

    /// Sets the identity flag.
    #[must_use]
    pub const fn identity(mut self, identity: bool) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the primary key flag.
    #[must_use]
    pub const fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Sets the column type.
    #[must_use]
    pub fn sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }
}

impl From<&ColumnDefinition> for ColumnOptions {
    fn from(column: &ColumnDefinition) -> Self {
        Self {
            default: column.default.clone(),
            null: column.null,
            identity: column.identity,
            primary_key: column.primary_key,
            sql_type: Some(column.full_sql_type()),
        }
    }
}

/// A foreign key constraint declared with a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Optional constraint name.
    #[serde(default)]
    pub name: Option<String>,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub to_table: String,
    /// Referenced columns.
    pub primary_key: Vec<String>,
    /// ON DELETE action.
    #[serde(default)]
    pub on_delete: Option<ForeignKeyAction>,
    /// ON UPDATE action.
    #[serde(default)]
    pub on_update: Option<ForeignKeyAction>,
}

/// A table to be created, either from columns or from a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub name: String,
    /// Whether the table only lives for the session.
    #[serde(default)]
    pub temporary: bool,
    /// Source query for create-table-as-select.
    #[serde(default, rename = "as")]
    pub as_query: Option<String>,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    /// Composite primary key (columns not declared inline).
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Foreign key constraints.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDefinition>,
}

impl TableDefinition {
    /// Creates an empty table definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temporary: false,
            as_query: None,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Marks the table as temporary.
    #[must_use]
    pub const fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Uses a query as the table source.
    #[must_use]
    pub fn as_query(mut self, query: impl Into<String>) -> Self {
        self.as_query = Some(query.into());
        self
    }

    /// Sets a composite primary key.
    #[must_use]
    pub fn primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKeyDefinition) -> Self {
        self.foreign_keys.push(fk);
        self
    }
}

/// An existing column as reported by the database.
///
/// `sql_type` is the dialect's formatted type text (`decimal(18,0)`,
/// `varchar(max)`); precision, scale and limit are the resolved numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Formatted native type.
    pub sql_type: String,
    /// Whether the column accepts NULL.
    #[serde(default = "default_true")]
    pub null: bool,
    /// Default literal as reported by the database.
    #[serde(default)]
    pub default: Option<String>,
    /// Precision for numeric types.
    #[serde(default)]
    pub precision: Option<u8>,
    /// Scale for numeric types.
    #[serde(default)]
    pub scale: Option<u8>,
    /// Declared length for character/binary types.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Whether values are engine-generated.
    #[serde(default)]
    pub identity: bool,
    /// Whether the column is (part of) the primary key.
    #[serde(default)]
    pub primary_key: bool,
}

const fn default_true() -> bool {
    true
}

impl ColumnDescriptor {
    /// Creates a nullable descriptor with no numeric details.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            null: true,
            default: None,
            precision: None,
            scale: None,
            limit: None,
            identity: false,
            primary_key: false,
        }
    }

    /// Returns the type name without arguments, lowercased.
    #[must_use]
    pub fn base_type(&self) -> String {
        let base = self
            .sql_type
            .split_once('(')
            .map_or(self.sql_type.as_str(), |(name, _)| name);
        base.trim().to_ascii_lowercase()
    }
}
