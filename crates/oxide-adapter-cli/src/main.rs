//! oxide-mssql CLI
//!
//! Command-line front end for the SQL Server dialect adapter: resolves and
//! casts types, renders DDL, describes introspected columns and shapes
//! statements against the capacity limits.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_adapter_core::{
    BindParameters, ColumnDescriptor, SchemaDumper, SqlValue, Statement, TableDefinition,
};
use oxide_adapter_mssql::{
    column_from_metadata, count_subquery, resolve_type, CapacityLimits, ColumnMetadata,
    MssqlAdapter, BIND_PARAMS_MAX, INSERT_ROWS_MAX, IN_CLAUSE_MAX,
};

/// SQL Server dialect tooling.
#[derive(Parser, Debug)]
#[command(name = "oxide-mssql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of values in an `IN (...)` list.
    #[arg(long, env = "MSSQL_IN_CLAUSE_MAX", default_value_t = IN_CLAUSE_MAX, global = true)]
    in_clause_max: usize,

    /// Maximum number of bound parameters per statement.
    #[arg(long, env = "MSSQL_BIND_PARAMS_MAX", default_value_t = BIND_PARAMS_MAX, global = true)]
    bind_params_max: usize,

    /// Maximum number of rows per multi-row insert.
    #[arg(long, env = "MSSQL_INSERT_ROWS_MAX", default_value_t = INSERT_ROWS_MAX, global = true)]
    insert_rows_max: usize,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a native type name to its column type.
    Resolve {
        /// Native type name, optionally with arguments (`decimal(15,2)`).
        sql_type: String,

        /// Explicit precision.
        #[arg(short, long)]
        precision: Option<u8>,

        /// Explicit scale.
        #[arg(short, long)]
        scale: Option<u8>,
    },

    /// Cast a JSON value for writing into a column of the given type.
    Cast {
        /// Native type name.
        sql_type: String,

        /// Value as JSON (`12.345`, `"9.11"`, `null`).
        value: String,
    },

    /// Render CREATE TABLE from a JSON table definition.
    CreateTable {
        /// JSON file holding the table definition.
        file: PathBuf,
    },

    /// Report schema-dump decisions for a JSON list of column descriptors.
    Dump {
        /// JSON file holding a list of column descriptors.
        file: PathBuf,
    },

    /// Describe driver column metadata the way the schema dumper sees it.
    Describe {
        /// JSON file holding a list of column metadata.
        file: PathBuf,
    },

    /// Split rows into multi-row INSERT statements.
    Insert {
        /// Target table.
        #[arg(short, long)]
        table: String,

        /// JSON file holding `{"columns": [...], "rows": [[...], ...]}`.
        file: PathBuf,
    },

    /// Append OFFSET/FETCH paging to a query.
    Page {
        /// Query to page.
        sql: String,

        /// Rows to skip.
        #[arg(long)]
        offset: Option<i64>,

        /// Rows to return.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Wrap a query in a row count.
    Count {
        /// Query to count.
        sql: String,
    },

    /// Show the capacity limits in effect.
    Limits,
}

#[derive(Debug, Deserialize)]
struct InsertInput {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<SqlValue>>,
}

impl Cli {
    const fn limits(&self) -> CapacityLimits {
        CapacityLimits::new(self.in_clause_max, self.bind_params_max, self.insert_rows_max)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn statement_json(statement: &Statement) -> serde_json::Value {
    json!({ "sql": statement.sql, "params": statement.params })
}

/// Schema-dump decisions for one column.
fn dump_json(adapter: &MssqlAdapter, column: &ColumnDescriptor) -> serde_json::Value {
    let primary_key = column
        .primary_key
        .then(|| adapter.primary_key_dump(column));
    json!({
        "name": column.name,
        "limit": adapter.schema_limit(column),
        "default_primary_key": adapter.is_default_primary_key(column),
        "primary_key": primary_key,
    })
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let adapter = MssqlAdapter::new(cli.limits());
    debug!(limits = ?adapter.limits(), "Adapter configured");

    let output = match cli.command {
        Commands::Resolve {
            sql_type,
            precision,
            scale,
        } => {
            let column_type = resolve_type(&sql_type, precision, scale)?;
            let bounds = column_type
                .bounds()
                .map(|b| json!({ "min": b.min.to_string(), "max": b.max.to_string() }));
            serde_json::to_string_pretty(&json!({
                "native": column_type.native(),
                "kind": column_type.kind().as_str(),
                "precision": column_type.precision(),
                "scale": column_type.scale(),
                "sql_type": column_type.sql_type(),
                "bounds": bounds,
            }))?
        }

        Commands::Cast { sql_type, value } => {
            let value: SqlValue =
                serde_json::from_str(&value).with_context(|| format!("Invalid JSON value: {value}"))?;
            let cast = resolve_type(&sql_type, None, None)?.cast_value(&value)?;
            serde_json::to_string(&cast)?
        }

        Commands::CreateTable { file } => {
            let table: TableDefinition = read_json(&file)?;
            info!(table = %table.name, "Rendering table definition");
            adapter.render_create_table(&table)?
        }

        Commands::Dump { file } => {
            let columns: Vec<ColumnDescriptor> = read_json(&file)?;
            let dumped: Vec<_> = columns.iter().map(|c| dump_json(&adapter, c)).collect();
            serde_json::to_string_pretty(&dumped)?
        }

        Commands::Describe { file } => {
            let metadata: Vec<ColumnMetadata> = read_json(&file)?;
            let described = metadata
                .iter()
                .map(|m| -> anyhow::Result<serde_json::Value> {
                    let column = column_from_metadata(m)?;
                    let mut dumped = dump_json(&adapter, &column);
                    dumped["column"] = serde_json::to_value(&column)?;
                    Ok(dumped)
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            serde_json::to_string_pretty(&described)?
        }

        Commands::Insert { table, file } => {
            let input: InsertInput = read_json(&file)?;
            let statements = adapter.insert_batches(&table, &input.columns, &input.rows)?;
            info!(table = %table, statements = statements.len(), "Shaped insert");
            let statements: Vec<_> = statements.iter().map(statement_json).collect();
            serde_json::to_string_pretty(&statements)?
        }

        Commands::Page { sql, offset, limit } => {
            let mut params = BindParameters::new();
            if let Some(offset) = offset {
                params = params.offset(SqlValue::Int(offset));
            }
            if let Some(limit) = limit {
                params = params.limit(SqlValue::Int(limit));
            }
            serde_json::to_string_pretty(&statement_json(&adapter.paged_statement(&sql, &params)))?
        }

        Commands::Count { sql } => count_subquery(&sql),

        Commands::Limits => serde_json::to_string_pretty(adapter.limits())?,
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = run(cli)?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("oxide-mssql").chain(args.iter().copied()))?;
        run(cli)
    }

    fn json_file(contents: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_limit_flags_default_to_engine_limits() {
        let cli = Cli::try_parse_from(["oxide-mssql", "limits"]).unwrap();
        assert_eq!(cli.limits(), CapacityLimits::default());
    }

    #[test]
    fn test_limit_flags_override() {
        let cli = Cli::try_parse_from(["oxide-mssql", "--insert-rows-max", "10", "limits"]).unwrap();
        assert_eq!(cli.limits().insert_rows_max, 10);
        assert_eq!(cli.limits().bind_params_max, BIND_PARAMS_MAX);
    }

    #[test]
    fn test_resolve_money() {
        let output = run_args(&["resolve", "money", "--precision", "10", "--scale", "2"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "money");
        assert_eq!(value["precision"], 19);
        assert_eq!(value["scale"], 4);
    }

    #[test]
    fn test_resolve_unknown_type_fails() {
        assert!(run_args(&["resolve", "geography"]).is_err());
    }

    #[test]
    fn test_cast_rounds_decimal() {
        let output = run_args(&["cast", "decimal(15,2)", "12.345"]).unwrap();
        assert_eq!(output, "\"12.35\"");
    }

    #[test]
    fn test_cast_rejects_out_of_range_tinyint() {
        assert!(run_args(&["cast", "tinyint", "256"]).is_err());
    }

    #[test]
    fn test_create_table_from_file() {
        let file = json_file(&json!({
            "name": "accounts",
            "columns": [
                { "name": "id", "sql_type": "int", "null": false, "identity": true, "primary_key": true },
                { "name": "balance", "sql_type": "money" }
            ]
        }));
        let output = run_args(&["create-table", file.path().to_str().unwrap()]).unwrap();
        assert_eq!(
            output,
            "CREATE TABLE [accounts] ([id] int NOT NULL IDENTITY(1,1) PRIMARY KEY, [balance] money)"
        );
    }

    #[test]
    fn test_describe_reports_primary_key_dump() {
        let file = json_file(&json!([
            {
                "name": "id",
                "type_name": "int",
                "driver_type": "integer",
                "column_size": 10,
                "nullable": false,
                "primary_key": true
            }
        ]));
        let output = run_args(&["describe", file.path().to_str().unwrap()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["primary_key"]["sql_type"], "integer");
        assert_eq!(value[0]["primary_key"]["explicit_default_null"], true);
    }

    #[test]
    fn test_dump_limits_and_identity_key() {
        let file = json_file(&json!([
            { "name": "id", "sql_type": "bigint", "identity": true, "primary_key": true },
            { "name": "body", "sql_type": "varchar(max)", "limit": 2_147_483_647_u32 },
            { "name": "title", "sql_type": "varchar(50)", "limit": 50 }
        ]));
        let output = run_args(&["dump", file.path().to_str().unwrap()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["default_primary_key"], true);
        assert_eq!(value[1]["limit"], serde_json::Value::Null);
        assert_eq!(value[2]["limit"], 50);
    }

    #[test]
    fn test_insert_splits_batches() {
        let rows: Vec<_> = (0..25).map(|i| json!([i, format!("row {i}")])).collect();
        let file = json_file(&json!({ "columns": ["id", "name"], "rows": rows }));
        let output = run_args(&[
            "--insert-rows-max",
            "10",
            "insert",
            "--table",
            "items",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[2]["params"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_page_binds_offset_first() {
        let output = run_args(&[
            "page",
            "SELECT * FROM t ORDER BY id",
            "--offset",
            "20",
            "--limit",
            "10",
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value["sql"],
            "SELECT * FROM t ORDER BY id OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
        );
        assert_eq!(value["params"], json!([20, 10]));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = run_args(&["create-table", "/nonexistent/table.json"]).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
