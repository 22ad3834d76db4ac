//! T-SQL DDL rendering.
//!
//! SQL Server differs from the generic renderer in four places:
//!
//! - column options gain `IDENTITY(1,1)` between `NOT NULL` and
//!   `PRIMARY KEY`, and identity columns never carry a `DEFAULT`;
//! - `RESTRICT` does not exist and is rendered as `NO ACTION`;
//! - temporary tables are named `#name` instead of using a keyword;
//! - create-table-as-select becomes `SELECT ... INTO ... FROM ...`.
//!
//! Numeric column types go through [`resolve_type`], so a declaration the
//! engine would reject (`decimal(50,2)`) fails before any SQL is produced.

use oxide_adapter_core::lexer::{find_top_level, tokens_with_depth, Keyword, TokenKind};
use oxide_adapter_core::{
    ColumnDefinition, ColumnOptions, DefaultValue, ForeignKeyAction, Quoting, ReferentialEvent,
    SchemaCreation, TableDefinition,
};
use tracing::{debug, warn};

use crate::adapter::MssqlAdapter;
use crate::cast::resolve_type;
use crate::error::{AdapterError, Result};

/// Abstract datetime types declared as plain `datetime`.
const DATETIME_ALIASES: [&str; 2] = ["datetime_basic", "smalldatetime"];

fn is_datetime_alias(sql_type: &str) -> bool {
    let name = sql_type.trim();
    DATETIME_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(name))
}

/// Splits `SELECT <projection> FROM <source>` at its first top-level `FROM`.
///
/// `FROM` inside parentheses, string literals, quoted or bracketed
/// identifiers and comments is not a boundary. Returns `None` when the text
/// does not start with `SELECT`, has no top-level `FROM`, or either part is
/// empty.
#[must_use]
pub fn split_select(query: &str) -> Option<(&str, &str)> {
    let tokens = tokens_with_depth(query);
    if tokens.iter().any(|t| t.token.is_error()) {
        return None;
    }
    let select = tokens.first()?;
    if !select.token.is_keyword(Keyword::Select) {
        return None;
    }
    let from_index = find_top_level(&tokens, Keyword::From, 1)?;
    let from = &tokens[from_index];

    // Ends at the last token before FROM so a trailing line comment is
    // not carried into the rewritten statement.
    let projection = query[select.token.span.end..tokens[from_index - 1].token.span.end].trim();
    let end = tokens
        .iter()
        .rev()
        .find(|t| !matches!(t.token.kind, TokenKind::Eof | TokenKind::Semicolon))
        .map_or(query.len(), |t| t.token.span.end);
    let source = query.get(from.token.span.end..end)?.trim();

    if projection.is_empty() || source.is_empty() {
        return None;
    }
    Some((projection, source))
}

impl MssqlAdapter {
    /// Renders the statement that creates `table`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::PatternMismatch`] when the table's `as` query
    /// cannot be split into projection and source, and
    /// [`AdapterError::InvalidValue`] when a numeric column declares a
    /// precision or scale the engine does not accept.
    pub fn render_create_table(&self, table: &TableDefinition) -> Result<String> {
        self.visit_table_definition(table)
    }

    /// Renders the referential action clause for `event`.
    #[must_use]
    pub fn render_foreign_key_action(&self, action: ForeignKeyAction, event: ReferentialEvent) -> String {
        self.action_sql(event, action)
    }

    fn select_into(&self, table: &TableDefinition, query: &str) -> Result<String> {
        let Some((projection, source)) = split_select(query) else {
            warn!(table = %table.name, query, "Cannot split create-table-as query");
            return Err(AdapterError::PatternMismatch {
                query: query.to_string(),
            });
        };
        let sql = format!(
            "SELECT {projection} INTO {} FROM {source}",
            self.table_name_sql(table)
        );
        debug!(table = %table.name, sql = %sql, "Rendered SELECT INTO");
        Ok(sql)
    }
}

impl SchemaCreation for MssqlAdapter {
    type Error = AdapterError;

    fn visit_table_definition(&self, table: &TableDefinition) -> Result<String> {
        match table.as_query {
            Some(ref query) => self.select_into(table, query),
            None => {
                for column in &table.columns {
                    if let Err(err @ AdapterError::InvalidValue { .. }) =
                        resolve_type(&column.sql_type, column.precision, column.scale)
                    {
                        warn!(table = %table.name, column = %column.name, "Invalid numeric column type");
                        return Err(err);
                    }
                }
                Ok(self.create_table_sql(table))
            }
        }
    }

    fn temporary_table_name(&self, name: &str) -> String {
        if name.starts_with('#') {
            name.to_string()
        } else {
            format!("#{name}")
        }
    }

    fn supports_temporary_keyword(&self) -> bool {
        false
    }

    fn type_to_sql(&self, column: &ColumnDefinition) -> String {
        if is_datetime_alias(&column.sql_type) {
            return "datetime".to_string();
        }
        resolve_type(&column.sql_type, column.precision, column.scale)
            .map_or_else(|_| column.full_sql_type(), |resolved| resolved.sql_type())
    }

    fn add_column_options(&self, sql: &mut String, options: &ColumnOptions) {
        if self.options_include_default(options) {
            if let Some(ref default) = options.default {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.quote_default_expression(default, options.sql_type.as_deref()));
            }
        }
        if options.null == Some(false) {
            sql.push_str(" NOT NULL");
        }
        if options.identity {
            sql.push_str(" IDENTITY(1,1)");
        }
        if options.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
    }

    fn options_include_default(&self, options: &ColumnOptions) -> bool {
        if options.identity {
            return false;
        }
        match options.default {
            None => false,
            Some(DefaultValue::Null) => options.null != Some(false),
            Some(_) => true,
        }
    }

    fn action_sql(&self, event: ReferentialEvent, action: ForeignKeyAction) -> String {
        let action = match action {
            ForeignKeyAction::Restrict => ForeignKeyAction::NoAction,
            other => other,
        };
        format!("ON {} {}", event.as_sql(), action.as_sql())
    }
}
