use crate::core::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

/// One fetched record: column name to value, in select-list order.
/// Column names are unique within a row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values: Vec::new(),
        }
    }

    /// Builds a row from `(name, value)` pairs; a repeated name keeps the
    /// last value.
    pub fn from_pairs<I, S>(entity: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut row = RowData::new(entity);
        for (name, value) in pairs {
            row.set(name, value);
        }
        row
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.field_values.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.field_values.push(FieldValue { name, value }),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }

    /// Column-name-to-value map handed to downstream consumers.
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.field_values
            .iter()
            .map(|f| (f.name.clone(), f.value.to_json()))
            .collect()
    }
}
