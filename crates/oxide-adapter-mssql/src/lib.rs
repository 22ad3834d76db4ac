//! # oxide-adapter-mssql
//!
//! Microsoft SQL Server dialect for `oxide-adapter-core`.
//!
//! [`MssqlAdapter`] implements the core traits with T-SQL rules:
//!
//! - **Types**: a closed registry of the numeric types ([`NativeType`]) and a
//!   single resolver ([`resolve_type`]) from native names to [`ColumnType`],
//!   which also casts values for writing
//! - **DDL**: bracket quoting, `IDENTITY(1,1)`, `NO ACTION` for `RESTRICT`,
//!   `#name` temporary tables and `SELECT ... INTO` for create-table-as
//! - **Introspection**: `sql_type` formatting from driver metadata and the
//!   schema-dump rules for limits and primary keys
//! - **Query shaping**: offset-before-limit bind order, `OFFSET`/`FETCH`
//!   paging and insert batching within [`CapacityLimits`]
//!
//! ## Example
//!
//! ```rust
//! use oxide_adapter_core::{BindParameters, ColumnDefinition, SqlValue, TableDefinition};
//! use oxide_adapter_mssql::{resolve_type, MssqlAdapter};
//!
//! let adapter = MssqlAdapter::default();
//!
//! let table = TableDefinition::new("accounts")
//!     .column(ColumnDefinition::new("id", "int").not_null().identity().primary_key());
//! assert_eq!(
//!     adapter.render_create_table(&table).unwrap(),
//!     "CREATE TABLE [accounts] ([id] int NOT NULL IDENTITY(1,1) PRIMARY KEY)"
//! );
//!
//! let money = resolve_type("money", None, None).unwrap();
//! assert_eq!((money.precision(), money.scale()), (Some(19), Some(4)));
//!
//! let params = BindParameters::new()
//!     .where_clause(vec![SqlValue::Int(1)])
//!     .limit(SqlValue::Int(10))
//!     .offset(SqlValue::Int(5));
//! assert_eq!(
//!     adapter.shape_bound_parameters(&params),
//!     vec![SqlValue::Int(1), SqlValue::Int(5), SqlValue::Int(10)]
//! );
//! ```

pub mod adapter;
pub mod cast;
pub mod error;
pub mod introspect;
pub mod limits;
pub mod schema_creation;
pub mod schema_dumper;
pub mod statements;
pub mod types;

pub use adapter::MssqlAdapter;
pub use cast::{bind_temporal, read_time, resolve_type};
pub use error::{AdapterError, Result};
pub use introspect::{
    column_from_metadata, format_sql_type, user_tables, ColumnMetadata, DriverType, TableRow,
};
pub use limits::{CapacityLimits, BIND_PARAMS_MAX, INSERT_ROWS_MAX, IN_CLAUSE_MAX};
pub use schema_creation::split_select;
pub use schema_dumper::NO_LIMIT_TYPES;
pub use statements::{count_subquery, has_order_by, is_exec};
pub use types::{Bounds, ColumnType, NativeType, TypeKind};
