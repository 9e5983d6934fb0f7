use crate::sql::base::{
    adapter::{RowStream, SqlAdapter},
    error::DbError,
};
use model::{
    core::normalize::normalize_row, metadata::table::Table, pagination::cursor::Cursor,
    records::row::RowData,
};
use planner::{
    query::{
        ast::select::Select,
        builder::select::SelectBuilder,
        ident,
        keyset::KeysetPlanner,
    },
    table_ref,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Upper bound on rows returned by one chunk query.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// A chunk that returned fewer rows than the chunk size is the last one.
pub fn is_final_chunk(row_count: usize, chunk_size: usize) -> bool {
    row_count < chunk_size
}

/// Issues one bounded, primary-key ordered query per call.
#[derive(Debug, Clone)]
pub struct ChunkExecutor {
    chunk_size: usize,
}

impl Default for ChunkExecutor {
    fn default() -> Self {
        ChunkExecutor::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkExecutor {
    /// A chunk size of zero is raised to one; a zero `LIMIT` could never
    /// make progress.
    pub fn new(chunk_size: usize) -> Self {
        ChunkExecutor {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Builds `SELECT <columns> FROM <schema>.<table> WHERE <keyset> ORDER BY
    /// <pk> LIMIT <chunk size>` for `cursor`.
    pub fn build_select(
        &self,
        planner: &KeysetPlanner,
        table: &Table,
        cursor: &Cursor,
    ) -> Result<Select, DbError> {
        let columns = table.columns.iter().map(|c| ident(&c.name)).collect();
        let builder = SelectBuilder::new()
            .select(columns)
            .from(table_ref!(table.schema, table.name), None);

        Ok(planner
            .apply_to_builder(builder, cursor, self.chunk_size)?
            .build())
    }

    /// Starts the chunk that follows `cursor`. The returned stream borrows
    /// the adapter until it is closed or dropped.
    pub async fn scan<'a, A>(
        &self,
        adapter: &'a mut A,
        table: &Table,
        cursor: &Cursor,
    ) -> Result<ChunkStream<'a>, DbError>
    where
        A: SqlAdapter + ?Sized,
    {
        let planner = KeysetPlanner::new(table)?;
        let select = self.build_select(&planner, table, cursor)?;

        debug!(table = %table, cursor = ?cursor.values(), "Scanning chunk");
        let rows = adapter.select_stream(&select).await?;

        Ok(ChunkStream {
            rows,
            planner,
            table: table.to_string(),
            chunk_size: self.chunk_size,
            row_count: 0,
            last_cursor: None,
            exhausted: false,
            started: Instant::now(),
        })
    }
}

/// Outcome of one chunk, produced when its stream is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSummary {
    /// Rows handed to the caller.
    pub row_count: usize,
    /// True when the result was exhausted with fewer rows than the chunk
    /// size: no further chunk exists.
    pub reached_end: bool,
    /// Primary-key tuple of the last row handed to the caller.
    pub last_cursor: Option<Cursor>,
    pub took_ms: u128,
}

impl ChunkSummary {
    /// Cursor for the following chunk, if there is one.
    pub fn next_cursor(&self) -> Option<&Cursor> {
        if self.reached_end {
            None
        } else {
            self.last_cursor.as_ref()
        }
    }
}

/// Lazy, forward-only sequence of normalized rows for one chunk.
pub struct ChunkStream<'a> {
    rows: Box<dyn RowStream + 'a>,
    planner: KeysetPlanner,
    table: String,
    chunk_size: usize,
    row_count: usize,
    last_cursor: Option<Cursor>,
    exhausted: bool,
    started: Instant,
}

impl ChunkStream<'_> {
    /// Returns the next row with its values normalized, or `None` once the
    /// chunk is exhausted.
    pub async fn next(&mut self) -> Result<Option<RowData>, DbError> {
        if self.exhausted {
            return Ok(None);
        }

        match self.rows.next_row().await? {
            Some(row) => {
                let row = normalize_row(row);
                self.last_cursor = Some(self.planner.next_cursor(&row)?);
                self.row_count += 1;
                Ok(Some(row))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Releases the statement, discarding unread rows. A stream closed
    /// before exhaustion never reports the end of the scan.
    pub async fn close(mut self) -> Result<ChunkSummary, DbError> {
        self.rows.close().await?;

        let summary = ChunkSummary {
            row_count: self.row_count,
            reached_end: self.exhausted && is_final_chunk(self.row_count, self.chunk_size),
            last_cursor: self.last_cursor.take(),
            took_ms: self.started.elapsed().as_millis(),
        };

        info!(
            table = %self.table,
            rows = summary.row_count,
            reached_end = summary.reached_end,
            took_ms = summary.took_ms,
            "Chunk finished"
        );

        Ok(summary)
    }

    /// Drains the chunk into memory and closes it.
    pub async fn collect(mut self) -> Result<(Vec<RowData>, ChunkSummary), DbError> {
        let mut rows = Vec::new();
        loop {
            match self.next().await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => break,
                Err(err) => {
                    // The statement still has to be released; the read
                    // error is the one reported.
                    let _ = self.rows.close().await;
                    return Err(err);
                }
            }
        }
        let summary = self.close().await?;
        Ok((rows, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_chunk_boundaries() {
        let chunk_size = 10;
        assert!(is_final_chunk(0, chunk_size));
        assert!(is_final_chunk(1, chunk_size));
        assert!(is_final_chunk(chunk_size - 1, chunk_size));
        assert!(!is_final_chunk(chunk_size, chunk_size));
    }

    #[test]
    fn test_zero_chunk_size_is_raised() {
        assert_eq!(ChunkExecutor::new(0).chunk_size(), 1);
        assert_eq!(ChunkExecutor::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }
}
