use sqlx::Row;
use tracing::debug;

use crate::db::decode;
use crate::db::{Dialect, SelectQuery, SourcePool};
use crate::errors::SeedError;
use crate::models::{SortDirection, TableRow};

/// What to read from a table.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Columns left out of the snapshot.
    pub exclude: Vec<String>,
    /// Optional ORDER BY column and direction.
    pub order_by: Option<(String, SortDirection)>,
    /// Row cap; 0 means unlimited.
    pub limit: u64,
}

/// Reads table snapshots from a [`SourcePool`].
pub struct RowFetcher<'a> {
    pool: &'a SourcePool,
}

impl<'a> RowFetcher<'a> {
    pub fn new(pool: &'a SourcePool) -> Self {
        Self { pool }
    }

    /// Checks whether `table` exists in the connected schema.
    pub async fn has_table(&self, table: &str) -> Result<bool, SeedError> {
        let exists = match self.pool {
            SourcePool::Postgres(pool) => sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM information_schema.tables
                    WHERE table_schema = current_schema() AND table_name = $1
                )
                "#,
            )
            .bind(table)
            .fetch_one(pool)
            .await?,
            SourcePool::MySql(pool) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM information_schema.tables
                    WHERE table_schema = DATABASE() AND table_name = ?
                    "#,
                )
                .bind(table)
                .fetch_one(pool)
                .await?
                    > 0
            }
            SourcePool::Sqlite(pool) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                )
                .bind(table)
                .fetch_one(pool)
                .await?
                    > 0
            }
        };
        Ok(exists)
    }

    /// Lists the columns of `table` in their declared order, read from the live schema.
    pub async fn column_listing(&self, table: &str) -> Result<Vec<String>, SeedError> {
        let columns = match self.pool {
            SourcePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    SELECT column_name::text FROM information_schema.columns
                    WHERE table_schema = current_schema() AND table_name = $1
                    ORDER BY ordinal_position
                    "#,
                )
                .bind(table)
                .fetch_all(pool)
                .await?
                .iter()
                .map(|row| row.try_get::<String, _>(0))
                .collect::<Result<Vec<_>, _>>()?
            }
            SourcePool::MySql(pool) => {
                sqlx::query(
                    r#"
                    SELECT CAST(column_name AS CHAR) FROM information_schema.columns
                    WHERE table_schema = DATABASE() AND table_name = ?
                    ORDER BY ordinal_position
                    "#,
                )
                .bind(table)
                .fetch_all(pool)
                .await?
                .iter()
                .map(|row| row.try_get::<String, _>(0))
                .collect::<Result<Vec<_>, _>>()?
            }
            SourcePool::Sqlite(pool) => {
                sqlx::query("SELECT name FROM pragma_table_info(?) ORDER BY cid")
                    .bind(table)
                    .fetch_all(pool)
                    .await?
                    .iter()
                    .map(|row| row.try_get::<String, _>(0))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(columns)
    }

    /// Reads the rows of `table`. Fails with [`SeedError::TableNotFound`] before
    /// running any data query if the table does not exist.
    pub async fn fetch(
        &self,
        table: &str,
        options: &FetchOptions,
    ) -> Result<Vec<TableRow>, SeedError> {
        if !self.has_table(table).await? {
            return Err(SeedError::TableNotFound(table.to_string()));
        }

        let mut query = SelectQuery::new(self.dialect(), table).limit(options.limit);

        if !options.exclude.is_empty() {
            let columns: Vec<String> = self
                .column_listing(table)
                .await?
                .into_iter()
                .filter(|c| !options.exclude.contains(c))
                .collect();
            query = query.columns(columns);
        }

        if let Some((column, direction)) = &options.order_by {
            query = query.order_by(column.as_str(), *direction);
        }

        let sql = query.build();
        debug!("Fetching rows: {sql}");

        let mut rows = match self.pool {
            SourcePool::Postgres(pool) => sqlx::query(&sql)
                .fetch_all(pool)
                .await?
                .iter()
                .map(decode::pg_row)
                .collect::<Result<Vec<_>, _>>()?,
            SourcePool::MySql(pool) => sqlx::query(&sql)
                .fetch_all(pool)
                .await?
                .iter()
                .map(decode::mysql_row)
                .collect::<Result<Vec<_>, _>>()?,
            SourcePool::Sqlite(pool) => sqlx::query(&sql)
                .fetch_all(pool)
                .await?
                .iter()
                .map(decode::sqlite_row)
                .collect::<Result<Vec<_>, _>>()?,
        };

        // Excluding every column still selects `*`, so filter again after decoding.
        if !options.exclude.is_empty() {
            for row in &mut rows {
                row.retain(|column| !options.exclude.iter().any(|e| e == column));
            }
        }

        debug!("Fetched {} rows from {table}", rows.len());
        Ok(rows)
    }

    fn dialect(&self) -> Dialect {
        self.pool.dialect()
    }
}
