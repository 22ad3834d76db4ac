//! Error types for the SQL Server adapter.

/// Errors raised by the adapter's translators.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// A create-table-as-select query could not be split into projection and
    /// source.
    #[error("Cannot split query into SELECT ... FROM ...: {query}")]
    PatternMismatch {
        /// The rejected query text.
        query: String,
    },

    /// A value does not fit the column's native type.
    #[error("Value {value} is out of range for {sql_type}")]
    OutOfRange {
        /// Native type the value was cast to.
        sql_type: String,
        /// The rejected value, as text.
        value: String,
    },

    /// The native type name is not one the registry knows.
    #[error("Unrecognized SQL Server type: {0}")]
    UnrecognizedType(String),

    /// A value cannot be interpreted for its target column or table.
    #[error("Invalid value for {target}: {message}")]
    InvalidValue {
        /// Native type or table the value was meant for.
        target: String,
        /// What was wrong with the value.
        message: String,
    },

    /// A statement cannot be shaped within the configured limits.
    #[error("Capacity exceeded: {what} needs {needed}, limit is {limit}")]
    CapacityExceeded {
        /// The limited quantity.
        what: &'static str,
        /// Amount required.
        needed: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Driver metadata is incomplete or inconsistent.
    #[error("Introspection error: {0}")]
    Introspection(String),

    /// The host executor failed.
    #[error("Execution failed: {0}")]
    Execute(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
