use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::{ast::select::Select, dialect::Dialect, renderer::render};
use tracing::debug;

/// Forward-only cursor over the result of one statement.
///
/// Rows are only available while the statement is open. Call
/// [`RowStream::close`] before issuing the next statement on the same
/// connection.
#[async_trait]
pub trait RowStream: Send {
    /// Returns the next row, or `None` once the result is exhausted.
    async fn next_row(&mut self) -> Result<Option<RowData>, DbError>;

    /// Discards any unread rows and releases the statement.
    async fn close(&mut self) -> Result<(), DbError>;
}

/// A single database connection. Only one statement may be in flight at a
/// time, which the `&mut self` receivers enforce.
#[async_trait]
pub trait SqlAdapter: Send {
    fn dialect(&self) -> &dyn Dialect;

    /// Catalog query returning one row per column of the current database,
    /// with `table_schema`, `table_name`, `column_name`, `ordinal_position`
    /// and `is_primary_key` columns.
    fn catalog_sql(&self) -> &'static str;

    /// Executes a parameterized statement and streams its rows.
    async fn query_stream<'a>(
        &'a mut self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Box<dyn RowStream + 'a>, DbError>;

    /// Renders `select` in this adapter's dialect and streams its rows.
    async fn select_stream<'a>(
        &'a mut self,
        select: &Select,
    ) -> Result<Box<dyn RowStream + 'a>, DbError> {
        let (sql, params) = render(select, self.dialect());
        debug!("Executing query: {}", sql);
        debug!("Parameters: {:?}", params);
        self.query_stream(&sql, params).await
    }

    /// Closes the connection gracefully.
    async fn disconnect(self) -> Result<(), DbError>
    where
        Self: Sized;
}
