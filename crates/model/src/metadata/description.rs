use crate::metadata::{column::Column, table::Table};
use std::collections::BTreeMap;

/// Every table of the introspected database, keyed by `(schema, table)`.
///
/// Tables iterate in key order and columns in ordinal order, so the content
/// does not depend on the order in which catalog rows arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    tables: BTreeMap<(String, String), Table>,
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: Column) {
        let key = (column.schema.clone(), column.table.clone());
        self.tables
            .entry(key)
            .or_insert_with(|| Table::new(&column.schema, &column.table))
            .add_column(column);
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables.get(&(schema.to_string(), name.to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
