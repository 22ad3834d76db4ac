#![allow(dead_code)]

use std::fmt;

use oxide_adapter_core::{ColumnDescriptor, SqlValue, Statement, StatementExecutor};
use oxide_adapter_mssql::{column_from_metadata, ColumnMetadata, DriverType, MssqlAdapter};

pub fn adapter() -> MssqlAdapter {
    MssqlAdapter::default()
}

/// Describes a column the way the driver would report it.
pub fn describe(type_name: &str, driver_type: DriverType, size: i32, digits: i32) -> ColumnDescriptor {
    let metadata = ColumnMetadata::new("value", type_name, driver_type).sizes(size, digits);
    column_from_metadata(&metadata)
        .unwrap_or_else(|e| panic!("Failed to describe {type_name}: {e:?}"))
}

pub fn rows(count: usize) -> Vec<Vec<SqlValue>> {
    (0..count)
        .map(|i| {
            vec![
                SqlValue::Int(i64::try_from(i).unwrap()),
                SqlValue::Text(format!("row {i}")),
            ]
        })
        .collect()
}

pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[derive(Debug)]
pub struct ExecError(pub String);

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ExecError {}

/// Executor that records statements and fails on a chosen call.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub executed: Vec<Statement>,
    pub fail_on: Option<usize>,
}

impl RecordingExecutor {
    pub fn failing_on(call: usize) -> Self {
        Self {
            executed: Vec::new(),
            fail_on: Some(call),
        }
    }

    pub fn sql(&self) -> Vec<&str> {
        self.executed.iter().map(|s| s.sql.as_str()).collect()
    }
}

impl StatementExecutor for RecordingExecutor {
    type Error = ExecError;

    fn execute(&mut self, statement: &Statement) -> Result<u64, Self::Error> {
        let call = self.executed.len();
        self.executed.push(statement.clone());
        if self.fail_on == Some(call) {
            return Err(ExecError(format!("call {call} failed")));
        }
        // One "(?" per inserted row.
        Ok(u64::try_from(statement.sql.matches("(?").count()).unwrap())
    }
}
