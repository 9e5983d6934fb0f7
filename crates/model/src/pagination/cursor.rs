use crate::{core::value::Value, records::row::RowData};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CursorError {
    #[error("Row has no value for primary key column '{0}'")]
    MissingKeyColumn(String),
}

/// Primary-key tuple of the last row emitted by the previous chunk.
///
/// Empty at the start of a scan; otherwise holds exactly one value per
/// primary-key column, in key order. The connector never stores it, callers
/// thread it from one chunk call to the next.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cursor(Vec<Value>);

impl Cursor {
    pub fn start() -> Self {
        Cursor(Vec::new())
    }

    pub fn new(values: Vec<Value>) -> Self {
        Cursor(values)
    }

    /// Extracts the primary-key tuple of `row`.
    pub fn from_row<S: AsRef<str>>(primary_keys: &[S], row: &RowData) -> Result<Self, CursorError> {
        primary_keys
            .iter()
            .map(|pk| {
                row.get(pk.as_ref())
                    .map(|field| field.value.clone())
                    .ok_or_else(|| CursorError::MissingKeyColumn(pk.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Cursor)
    }

    pub fn is_start(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}
