//! Statements, bind parameters and the execution seam.

use crate::value::SqlValue;

/// Bind values of a query, grouped by the clause they belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindParameters {
    /// Values bound in the `FROM` clause (derived tables).
    pub from: Vec<SqlValue>,
    /// Values bound in `JOIN` conditions.
    pub join: Vec<SqlValue>,
    /// Values bound in the `WHERE` clause.
    pub where_clause: Vec<SqlValue>,
    /// Values bound in the `HAVING` clause.
    pub having: Vec<SqlValue>,
    /// Row limit, if the query is limited.
    pub limit: Option<SqlValue>,
    /// Row offset, if the query is offset.
    pub offset: Option<SqlValue>,
}

impl BindParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `FROM` values.
    #[must_use]
    pub fn from(mut self, values: Vec<SqlValue>) -> Self {
        self.from = values;
        self
    }

    /// Sets the `JOIN` values.
    #[must_use]
    pub fn join(mut self, values: Vec<SqlValue>) -> Self {
        self.join = values;
        self
    }

    /// Sets the `WHERE` values.
    #[must_use]
    pub fn where_clause(mut self, values: Vec<SqlValue>) -> Self {
        self.where_clause = values;
        self
    }

    /// Sets the `HAVING` values.
    #[must_use]
    pub fn having(mut self, values: Vec<SqlValue>) -> Self {
        self.having = values;
        self
    }

    /// Sets the limit value.
    #[must_use]
    pub fn limit(mut self, value: SqlValue) -> Self {
        self.limit = Some(value);
        self
    }

    /// Sets the offset value.
    #[must_use]
    pub fn offset(mut self, value: SqlValue) -> Self {
        self.offset = Some(value);
        self
    }

    /// Clause values in textual order, without limit and offset.
    #[must_use]
    pub fn clause_values(&self) -> Vec<SqlValue> {
        let mut result = Vec::with_capacity(
            self.from.len() + self.join.len() + self.where_clause.len() + self.having.len() + 2,
        );
        result.extend(self.from.iter().cloned());
        result.extend(self.join.iter().cloned());
        result.extend(self.where_clause.iter().cloned());
        result.extend(self.having.iter().cloned());
        result
    }
}

/// Dialect hooks for assembling statements.
pub trait DatabaseStatements {
    /// Flattens bind parameters in the order their placeholders appear.
    ///
    /// The generic order puts the limit before the offset
    /// (`LIMIT ? OFFSET ?`).
    fn combine_bind_parameters(&self, params: &BindParameters) -> Vec<SqlValue> {
        let mut result = params.clause_values();
        result.extend(params.limit.iter().cloned());
        result.extend(params.offset.iter().cloned());
        result
    }

    /// Maximum number of items in an `IN (...)` list, if bounded.
    fn in_clause_length(&self) -> Option<usize> {
        None
    }

    /// Maximum number of bind parameters in one statement.
    fn bind_params_length(&self) -> usize {
        65_535
    }

    /// Maximum number of rows in one multi-row `INSERT`.
    fn insert_rows_length(&self) -> usize {
        self.bind_params_length()
    }
}

/// A statement text together with its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Creates a statement without parameters.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with parameters.
    #[must_use]
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Runs statements against a connection owned by the host.
pub trait StatementExecutor {
    /// Error type of the underlying connection.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes a statement and returns the number of affected rows.
    fn execute(&mut self, statement: &Statement) -> Result<u64, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Generic;

    impl DatabaseStatements for Generic {}

    #[test]
    fn test_generic_bind_order_limit_then_offset() {
        let params = BindParameters::new()
            .join(vec![SqlValue::Int(1)])
            .from(vec![SqlValue::Int(0)])
            .where_clause(vec![SqlValue::Text("a".to_string())])
            .having(vec![SqlValue::Int(2)])
            .limit(SqlValue::Int(10))
            .offset(SqlValue::Int(20));
        assert_eq!(
            Generic.combine_bind_parameters(&params),
            vec![
                SqlValue::Int(0),
                SqlValue::Int(1),
                SqlValue::Text("a".to_string()),
                SqlValue::Int(2),
                SqlValue::Int(10),
                SqlValue::Int(20),
            ]
        );
    }

    #[test]
    fn test_generic_limits() {
        assert_eq!(Generic.in_clause_length(), None);
        assert_eq!(Generic.bind_params_length(), 65_535);
        assert_eq!(Generic.insert_rows_length(), 65_535);
    }

    #[test]
    fn test_empty_parameters() {
        assert!(Generic.combine_bind_parameters(&BindParameters::new()).is_empty());
    }
}
