use crate::metadata::column::Column;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table and its columns, kept in ordinal order.
///
/// The primary-key columns, taken in that same order, define the
/// lexicographic order in which the table is scanned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(schema: &str, name: &str) -> Self {
        Table {
            schema: schema.to_string(),
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Inserts `column` at its ordinal position, replacing a column with the
    /// same name.
    pub fn add_column(&mut self, column: Column) {
        self.columns.retain(|c| c.name != column.name);
        let idx = self
            .columns
            .partition_point(|c| (c.ordinal, c.name.as_str()) < (column.ordinal, column.name.as_str()));
        self.columns.insert(idx, column);
    }

    /// Column names in select order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Primary-key column names in scan order: the order of the key
    /// definition, falling back to column order when it is unknown.
    pub fn primary_keys(&self) -> Vec<String> {
        let mut keys: Vec<&Column> = self.columns.iter().filter(|c| c.is_primary_key).collect();
        keys.sort_by_key(|c| (c.key_position.is_none(), c.key_position, c.ordinal));
        keys.into_iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.is_primary_key)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_sorted_by_ordinal() {
        let mut table = Table::new("shop", "orders");
        table.add_column(Column::new("shop", "orders", "total", 3, false));
        table.add_column(Column::new("shop", "orders", "id", 2, true));
        table.add_column(Column::new("shop", "orders", "region", 1, true));

        assert_eq!(table.column_names(), vec!["region", "id", "total"]);
        assert_eq!(table.primary_keys(), vec!["region", "id"]);
        assert_eq!(table.to_string(), "shop.orders");
    }

    #[test]
    fn test_primary_keys_follow_key_definition() {
        // PRIMARY KEY (b, a) on columns declared as (a, b, c).
        let mut table = Table::new("shop", "pairs");
        table.add_column(Column::new("shop", "pairs", "a", 1, false).with_key_position(2));
        table.add_column(Column::new("shop", "pairs", "b", 2, false).with_key_position(1));
        table.add_column(Column::new("shop", "pairs", "c", 3, false));

        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.primary_keys(), vec!["b", "a"]);
    }

    #[test]
    fn test_add_column_replaces_same_name() {
        let mut table = Table::new("shop", "orders");
        table.add_column(Column::new("shop", "orders", "id", 1, false));
        table.add_column(Column::new("shop", "orders", "id", 1, true));
        assert_eq!(table.columns.len(), 1);
        assert!(table.has_primary_key());
    }
}
