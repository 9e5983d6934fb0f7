//! Resolves ambiguous driver values into their canonical representation.
//!
//! Drivers return textual, decimal and temporal columns as raw byte buffers.
//! Normalization turns every buffer that is valid UTF-8 into a `String`;
//! buffers that are not valid UTF-8 are binary payloads and are kept as
//! they are. Every other value passes through untouched, so the mapping is
//! total and idempotent.

use crate::{core::value::Value, records::row::RowData};

pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Value::String(text),
            Err(err) => Value::Bytes(err.into_bytes()),
        },
        Value::Null
        | Value::Boolean(_)
        | Value::Int(_)
        | Value::Uint(_)
        | Value::Float(_)
        | Value::Decimal(_)
        | Value::String(_)
        | Value::Date(_)
        | Value::Timestamp(_) => value,
    }
}

pub fn normalize_row(mut row: RowData) -> RowData {
    for field in row.field_values.iter_mut() {
        let value = std::mem::replace(&mut field.value, Value::Null);
        field.value = normalize_value(value);
    }
    row
}
