use crate::sql::base::{
    adapter::SqlAdapter,
    describe::SchemaDescriber,
    error::DbError,
    executor::{ChunkExecutor, ChunkStream},
};
use model::{metadata::description::Description, metadata::table::Table, pagination::cursor::Cursor};

/// A connected source: owns its connection and exposes Describe and Scan.
///
/// The source keeps no scan state between calls; the caller threads the
/// cursor from each chunk's summary into the next `scan`.
pub struct SqlSource<A: SqlAdapter> {
    adapter: A,
    describer: SchemaDescriber,
    executor: ChunkExecutor,
}

impl<A: SqlAdapter> SqlSource<A> {
    pub fn new(adapter: A, chunk_size: usize) -> Self {
        Self {
            adapter,
            describer: SchemaDescriber::new(),
            executor: ChunkExecutor::new(chunk_size),
        }
    }

    pub async fn describe(&mut self) -> Result<Description, DbError> {
        self.describer.describe(&mut self.adapter).await
    }

    pub async fn scan(&mut self, table: &Table, cursor: &Cursor) -> Result<ChunkStream<'_>, DbError> {
        self.executor.scan(&mut self.adapter, table, cursor).await
    }

    pub fn chunk_size(&self) -> usize {
        self.executor.chunk_size()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub async fn close(self) -> Result<(), DbError> {
        self.adapter.disconnect().await
    }
}
