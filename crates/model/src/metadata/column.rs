use serde::{Deserialize, Serialize};

/// One catalog column, as reported by schema introspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub schema: String,
    pub table: String,
    pub name: String,
    /// 1-based position of the column within its table.
    pub ordinal: u32,
    pub is_primary_key: bool,
    /// 1-based position of the column within the primary key, when the
    /// catalog reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_position: Option<u32>,
}

impl Column {
    pub fn new(schema: &str, table: &str, name: &str, ordinal: u32, is_primary_key: bool) -> Self {
        Column {
            schema: schema.to_string(),
            table: table.to_string(),
            name: name.to_string(),
            ordinal,
            is_primary_key,
            key_position: None,
        }
    }

    /// Marks the column as the `position`-th primary-key column.
    pub fn with_key_position(mut self, position: u32) -> Self {
        self.is_primary_key = true;
        self.key_position = Some(position);
        self
    }
}
