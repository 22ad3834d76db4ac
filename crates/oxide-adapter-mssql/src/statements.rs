//! Query shaping: bind order, paging, batching and capacity limits.

use oxide_adapter_core::lexer::{find_top_level, tokens_with_depth, Keyword};
use oxide_adapter_core::{
    BindParameters, DatabaseStatements, Quoting, SqlValue, Statement, StatementExecutor,
};
use tracing::debug;

use crate::adapter::MssqlAdapter;
use crate::cast::bind_temporal;
use crate::error::{AdapterError, Result};

/// Alias of the derived table built by [`count_subquery`].
pub const COUNT_SUBQUERY_ALIAS: &str = "subquery_for_count";

/// Ordering used when a paged query has none of its own.
pub const UNORDERED_PAGING: &str = "ORDER BY (SELECT NULL)";

impl DatabaseStatements for MssqlAdapter {
    /// `OFFSET ? ROWS FETCH NEXT ? ROWS ONLY` binds the offset first.
    fn combine_bind_parameters(&self, params: &BindParameters) -> Vec<SqlValue> {
        let mut result = params.clause_values();
        result.extend(params.offset.iter().cloned());
        result.extend(params.limit.iter().cloned());
        result
    }

    fn in_clause_length(&self) -> Option<usize> {
        Some(self.limits().in_clause_max)
    }

    fn bind_params_length(&self) -> usize {
        self.limits().bind_params_max
    }

    fn insert_rows_length(&self) -> usize {
        self.limits().insert_rows_max
    }
}

/// Whether `sql` calls a stored procedure (`EXEC` / `EXECUTE`).
#[must_use]
pub fn is_exec(sql: &str) -> bool {
    sql.trim_start()
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("exec"))
}

/// Wraps `select` in `SELECT COUNT(*) FROM (...) subquery_for_count`.
///
/// SQL Server rejects `ORDER BY` in a derived table unless `TOP` or
/// `OFFSET` comes with it, so a trailing top-level `ORDER BY` is dropped
/// in the other cases.
#[must_use]
pub fn count_subquery(select: &str) -> String {
    let select = select.trim().trim_end_matches(';').trim_end();
    let tokens = tokens_with_depth(select);

    let last_order = (0..tokens.len()).rev().find(|&i| {
        tokens[i].depth == 0
            && tokens[i].token.is_keyword(Keyword::Order)
            && tokens.get(i + 1).is_some_and(|n| n.token.is_keyword(Keyword::By))
    });

    let inner = match last_order {
        Some(order)
            if find_top_level(&tokens, Keyword::Offset, order).is_none()
                && find_top_level(&tokens, Keyword::Top, 0).is_none() =>
        {
            select[..tokens[order].token.span.start].trim_end()
        }
        _ => select,
    };
    format!("SELECT COUNT(*) FROM ({inner}) {COUNT_SUBQUERY_ALIAS}")
}

/// Whether `sql` has a top-level `ORDER BY`.
#[must_use]
pub fn has_order_by(sql: &str) -> bool {
    let tokens = tokens_with_depth(sql);
    tokens.windows(2).any(|pair| {
        pair[0].depth == 0
            && pair[0].token.is_keyword(Keyword::Order)
            && pair[1].token.is_keyword(Keyword::By)
    })
}

impl MssqlAdapter {
    /// Flattens bind parameters in placeholder order (offset before limit).
    #[must_use]
    pub fn shape_bound_parameters(&self, params: &BindParameters) -> Vec<SqlValue> {
        self.combine_bind_parameters(params)
    }

    /// Renders the paging clause for a query.
    ///
    /// Placeholders appear offset first, matching
    /// [`DatabaseStatements::combine_bind_parameters`]. A limit without an
    /// offset pins the offset to `0` so that only one value is bound.
    /// SQL Server only pages ordered results, so an unordered query gets
    /// `ORDER BY (SELECT NULL)` in front. Returns `None` when the query is
    /// neither offset nor limited.
    #[must_use]
    pub fn paging_clause(&self, ordered: bool, offset: bool, limit: bool) -> Option<String> {
        let paging = match (offset, limit) {
            (true, true) => "OFFSET ? ROWS FETCH NEXT ? ROWS ONLY",
            (true, false) => "OFFSET ? ROWS",
            (false, true) => "OFFSET 0 ROWS FETCH NEXT ? ROWS ONLY",
            (false, false) => return None,
        };
        if ordered {
            Some(paging.to_string())
        } else {
            Some(format!("{UNORDERED_PAGING} {paging}"))
        }
    }

    /// Appends the paging clause to `sql` and returns the statement with
    /// its parameters in placeholder order.
    #[must_use]
    pub fn paged_statement(&self, sql: &str, params: &BindParameters) -> Statement {
        let sql = sql.trim().trim_end_matches(';').trim_end();
        let clause = self.paging_clause(
            has_order_by(sql),
            params.offset.is_some(),
            params.limit.is_some(),
        );
        let sql = match clause {
            Some(clause) => format!("{sql} {clause}"),
            None => sql.to_string(),
        };
        debug!(sql = %sql, "Paged statement");
        Statement::with_params(sql, self.combine_bind_parameters(params))
    }

    /// Splits a multi-row insert into statements within the capacity limits.
    ///
    /// Each statement carries at most `insert_rows_max` rows and at most
    /// `bind_params_max` parameters. Temporal values are bound as text.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidValue`] when there are no columns or a
    /// row has the wrong number of values, and
    /// [`AdapterError::CapacityExceeded`] when a single row needs more
    /// parameters than one statement may bind.
    pub fn insert_batches(
        &self,
        table: &str,
        columns: &[String],
        rows: &[Vec<SqlValue>],
    ) -> Result<Vec<Statement>> {
        if columns.is_empty() {
            return Err(AdapterError::InvalidValue {
                target: table.to_string(),
                message: "insert without columns".to_string(),
            });
        }
        let bind_limit = self.bind_params_length();
        if columns.len() > bind_limit {
            return Err(AdapterError::CapacityExceeded {
                what: "bind parameters per row",
                needed: columns.len(),
                limit: bind_limit,
            });
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(AdapterError::InvalidValue {
                target: table.to_string(),
                message: format!(
                    "row {index} has {} values, expected {}",
                    row.len(),
                    columns.len()
                ),
            });
        }

        let rows_per_batch = self
            .insert_rows_length()
            .min(bind_limit / columns.len())
            .max(1);

        let head = format!(
            "INSERT INTO {} ({}) VALUES ",
            self.quote_table_name(table),
            columns
                .iter()
                .map(|c| self.quote_column_name(c))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let row_placeholders = format!("({})", vec!["?"; columns.len()].join(", "));

        let statements: Vec<Statement> = rows
            .chunks(rows_per_batch)
            .map(|chunk| {
                let sql = format!("{head}{}", vec![row_placeholders.as_str(); chunk.len()].join(", "));
                let params = chunk.iter().flatten().map(bind_temporal).collect();
                Statement::with_params(sql, params)
            })
            .collect();

        debug!(
            table,
            rows = rows.len(),
            batches = statements.len(),
            rows_per_batch,
            "Split insert into batches"
        );
        Ok(statements)
    }

    /// Inserts fixture rows through the host executor.
    ///
    /// When the rows supply values for `identity_column`, the batches run
    /// between `SET IDENTITY_INSERT <table> ON` and `OFF`. `OFF` is issued
    /// even if a batch fails. Returns the number of inserted rows.
    ///
    /// # Errors
    ///
    /// Returns the shaping errors of [`Self::insert_batches`] and wraps
    /// executor failures in [`AdapterError::Execute`].
    pub fn insert_fixtures<E: StatementExecutor>(
        &self,
        executor: &mut E,
        table: &str,
        columns: &[String],
        rows: &[Vec<SqlValue>],
        identity_column: Option<&str>,
    ) -> Result<u64> {
        let statements = self.insert_batches(table, columns, rows)?;
        let identity_insert = identity_column.is_some_and(|id| columns.iter().any(|c| c == id));
        let quoted = self.quote_table_name(table);

        let mut run = |statement: &Statement| {
            debug!(sql = %statement.sql, params = statement.params.len(), "Executing fixture statement");
            executor
                .execute(statement)
                .map_err(|e| AdapterError::Execute(Box::new(e)))
        };

        if identity_insert {
            run(&Statement::new(format!("SET IDENTITY_INSERT {quoted} ON")))?;
        }
        let inserted = statements
            .iter()
            .try_fold(0_u64, |total, statement| run(statement).map(|n| total + n));
        if identity_insert {
            let off = run(&Statement::new(format!("SET IDENTITY_INSERT {quoted} OFF")));
            let inserted = inserted?;
            off?;
            return Ok(inserted);
        }
        inserted
    }
}
