//! # oxide-adapter-core
//!
//! Dialect-neutral building blocks for database adapters.
//!
//! A host ORM hands an adapter schema definitions, column metadata and
//! pre-rendered statements; the adapter turns them into dialect SQL and
//! bind-parameter lists. This crate defines the shared vocabulary and the
//! overridable behavior:
//!
//! - [`schema`]: table, column and foreign key definitions and descriptors
//! - [`value`]: bound parameter values
//! - [`quoting`]: identifier and literal quoting ([`Quoting`])
//! - [`schema_creation`]: `CREATE TABLE` rendering ([`SchemaCreation`])
//! - [`schema_dumper`]: dump-time column rules ([`SchemaDumper`])
//! - [`statements`]: bind ordering, capacity accessors and the execution seam
//! - [`lexer`]: a statement-level tokenizer for clause-boundary rewrites
//!
//! Every trait method has a generic default. A dialect implements the traits
//! for its adapter type and overrides only what differs, calling back into
//! the other methods for the rest.

pub mod lexer;
pub mod quoting;
pub mod schema;
pub mod schema_creation;
pub mod schema_dumper;
pub mod statements;
pub mod value;

pub use quoting::Quoting;
pub use schema::{
    ColumnDefinition, ColumnDescriptor, ColumnOptions, DefaultValue, ForeignKeyAction,
    ForeignKeyDefinition, ReferentialEvent, TableDefinition,
};
pub use schema_creation::SchemaCreation;
pub use schema_dumper::{PrimaryKeyDump, SchemaDumper};
pub use statements::{BindParameters, DatabaseStatements, Statement, StatementExecutor};
pub use value::SqlValue;
