use model::pagination::cursor::CursorError;
use planner::error::PlanError;
use std::time::Duration;
use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database could not be reached, authenticated against, or the
    /// connection dropped.
    #[error("Connectivity error: {0}")]
    Connectivity(#[source] mysql_async::Error),

    /// The connection was not established within the configured timeout.
    #[error("Connectivity error: no connection within {0:?}")]
    ConnectTimeout(Duration),

    /// Statement preparation, execution or result iteration failed
    /// (malformed SQL, missing table, missing privileges, ...).
    #[error("Query error: {0}")]
    Query(#[source] mysql_async::Error),

    /// The caller broke a planning contract, e.g. a cursor whose arity does
    /// not match the primary key.
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PlanError),

    /// A fetched row lacks a primary-key column needed for the next cursor.
    #[error("Precondition failed: {0}")]
    Cursor(#[from] CursorError),

    /// A catalog row could not be decoded into column metadata.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The connection configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DbError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, DbError::Precondition(_) | DbError::Cursor(_))
    }
}
