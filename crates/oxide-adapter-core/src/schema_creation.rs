//! DDL rendering with overridable steps.
//!
//! [`SchemaCreation`] renders `CREATE TABLE` statements out of small steps
//! (column definition, column options, foreign key clause, referential
//! action). Every step has a generic default; a dialect overrides only the
//! steps where its syntax differs and delegates to the rest.

use tracing::debug;

use crate::quoting::Quoting;
use crate::schema::{
    ColumnDefinition, ColumnOptions, DefaultValue, ForeignKeyAction, ForeignKeyDefinition,
    ReferentialEvent, TableDefinition,
};

/// Trait for dialect-specific DDL generation.
pub trait SchemaCreation: Quoting {
    /// Error raised by dialects that reject some table definitions.
    type Error;

    /// Renders the statement that creates `table`.
    fn visit_table_definition(&self, table: &TableDefinition) -> Result<String, Self::Error> {
        Ok(self.create_table_sql(table))
    }

    /// Generic `CREATE TABLE` rendering from the table's columns.
    fn create_table_sql(&self, table: &TableDefinition) -> String {
        let mut sql = String::from("CREATE ");
        if table.temporary && self.supports_temporary_keyword() {
            sql.push_str("TEMPORARY ");
        }
        sql.push_str("TABLE ");
        sql.push_str(&self.table_name_sql(table));
        sql.push_str(" (");

        let mut parts: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();

        if !table.primary_key.is_empty() {
            let cols: Vec<String> = table
                .primary_key
                .iter()
                .map(|c| self.quote_column_name(c))
                .collect();
            parts.push(format!("PRIMARY KEY ({})", cols.join(", ")));
        }

        parts.extend(
            table
                .foreign_keys
                .iter()
                .map(|fk| self.foreign_key_definition(fk)),
        );

        sql.push_str(&parts.join(", "));
        sql.push(')');
        debug!(table = %table.name, sql = %sql, "Rendered CREATE TABLE");
        sql
    }

    /// Returns the quoted name a table is created under.
    fn table_name_sql(&self, table: &TableDefinition) -> String {
        if table.temporary {
            self.quote_table_name(&self.temporary_table_name(&table.name))
        } else {
            self.quote_table_name(&table.name)
        }
    }

    /// Returns the name a temporary table is created under.
    fn temporary_table_name(&self, name: &str) -> String {
        name.to_string()
    }

    /// Whether `CREATE TEMPORARY TABLE` is valid syntax.
    fn supports_temporary_keyword(&self) -> bool {
        true
    }

    /// Renders the native type of a column.
    fn type_to_sql(&self, column: &ColumnDefinition) -> String {
        column.full_sql_type()
    }

    /// Renders one column line of a `CREATE TABLE`.
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_column_name(&column.name),
            self.type_to_sql(column)
        );
        self.add_column_options(&mut sql, &ColumnOptions::from(column));
        sql
    }

    /// Renders only the trailing option clauses for `options`.
    fn render_column_options(&self, options: &ColumnOptions) -> String {
        let mut sql = String::new();
        self.add_column_options(&mut sql, options);
        sql
    }

    /// Appends the option clauses of a column to `sql`.
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
        if options.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
    }

    /// Whether a `DEFAULT` clause should be rendered.
    ///
    /// A `NULL` default on a NOT NULL column is dropped rather than emitted
    /// as a contradiction.
    fn options_include_default(&self, options: &ColumnOptions) -> bool {
        match options.default {
            None => false,
            Some(DefaultValue::Null) => options.null != Some(false),
            Some(_) => true,
        }
    }

    /// Renders a `FOREIGN KEY` table constraint.
    fn foreign_key_definition(&self, fk: &ForeignKeyDefinition) -> String {
        let mut sql = String::new();
        if let Some(ref name) = fk.name {
            sql.push_str(&format!("CONSTRAINT {} ", self.quote_identifier(name)));
        }
        let cols: Vec<String> = fk.columns.iter().map(|c| self.quote_column_name(c)).collect();
        let ref_cols: Vec<String> = fk
            .primary_key
            .iter()
            .map(|c| self.quote_column_name(c))
            .collect();
        sql.push_str(&format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            cols.join(", "),
            self.quote_table_name(&fk.to_table),
            ref_cols.join(", ")
        ));
        if let Some(action) = fk.on_delete {
            sql.push(' ');
            sql.push_str(&self.action_sql(ReferentialEvent::Delete, action));
        }
        if let Some(action) = fk.on_update {
            sql.push(' ');
            sql.push_str(&self.action_sql(ReferentialEvent::Update, action));
        }
        sql
    }

    /// Renders `ON <event> <action>`.
    fn action_sql(&self, event: ReferentialEvent, action: ForeignKeyAction) -> String {
        format!("ON {} {}", event.as_sql(), action.as_sql())
    }
}
