use thiserror::Error;

/// Caller contract violations detected while planning a chunk query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The cursor does not carry exactly one value per primary-key column.
    #[error("Cursor for table '{table}' has {actual} values, expected 0 or {expected}")]
    CursorArity {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Keyset pagination needs a primary key to order by.
    #[error("Table '{table}' has no primary key and cannot be scanned")]
    MissingPrimaryKey { table: String },
}
