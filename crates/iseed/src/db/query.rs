//! SELECT builder for snapshot queries.
//!
//! Identifiers are quoted per [`Dialect`] and the limit is rendered as an
//! integer, so the statement carries no bind parameters.

use crate::db::Dialect;
use crate::models::SortDirection;

/// Builder for `SELECT <columns> FROM <table> [ORDER BY ..] [LIMIT ..]`.
///
/// # Example
/// ```
/// use iseed::db::{Dialect, SelectQuery};
/// use iseed::models::SortDirection;
///
/// let sql = SelectQuery::new(Dialect::Postgres, "users")
///     .columns(["id", "email"])
///     .order_by("id", SortDirection::Desc)
///     .limit(10)
///     .build();
/// assert_eq!(sql, r#"SELECT "id", "email" FROM "users" ORDER BY "id" DESC LIMIT 10"#);
/// ```
#[derive(Debug, Clone)]
pub struct SelectQuery {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
    order: Option<(String, SortDirection)>,
    limit: u64,
}

impl SelectQuery {
    /// Selects every column of `table`.
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            columns: Vec::new(),
            order: None,
            limit: 0,
        }
    }

    /// Restricts the selection to `columns`. An empty list keeps `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Caps the row count; 0 means unlimited.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn build(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| self.dialect.quote_ident(c))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {columns} FROM {}",
            self.dialect.quote_ident(&self.table)
        );

        if let Some((column, direction)) = &self.order {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                self.dialect.quote_ident(column),
                direction.as_sql()
            ));
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }

        sql
    }
}
