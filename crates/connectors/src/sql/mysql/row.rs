use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use model::{core::value::Value, records::row::RowData};
use mysql_async::{Row as MySqlRow, Value as MySqlValue, consts::ColumnType};
use tracing::warn;

/// Converts a driver row into [`RowData`]. Text columns arrive as raw bytes
/// and are resolved later by the normalizer.
pub fn row_data(row: &MySqlRow) -> RowData {
    let columns = row.columns_ref();
    let entity = columns
        .first()
        .map(|c| c.table_str().into_owned())
        .unwrap_or_default();

    let mut data = RowData::new(&entity);
    for (idx, column) in columns.iter().enumerate() {
        let value = row
            .as_ref(idx)
            .map(|v| value_from_mysql(v.clone(), column.column_type()))
            .unwrap_or(Value::Null);
        data.set(column.name_str().into_owned(), value);
    }
    data
}

/// Maps every driver value kind to a model value.
pub fn value_from_mysql(value: MySqlValue, column_type: ColumnType) -> Value {
    match value {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Bytes(b)
            if matches!(
                column_type,
                ColumnType::MYSQL_TYPE_NEWDECIMAL | ColumnType::MYSQL_TYPE_DECIMAL
            ) =>
        {
            decimal_value(b)
        }
        MySqlValue::Bytes(b) => Value::Bytes(b),
        MySqlValue::Int(i) => Value::Int(i),
        MySqlValue::UInt(u) => Value::Uint(u),
        MySqlValue::Float(f) => Value::Float(f as f64),
        MySqlValue::Double(d) => Value::Float(d),
        MySqlValue::Date(year, month, day, hour, minute, second, micros) => {
            let date_only = matches!(
                column_type,
                ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE
            );
            temporal_value(date_only, year, month, day, hour, minute, second, micros)
        }
        MySqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            Value::String(time_text(negative, days, hours, minutes, seconds, micros))
        }
    }
}

fn decimal_value(bytes: Vec<u8>) -> Value {
    match std::str::from_utf8(&bytes).ok().and_then(|t| t.parse::<BigDecimal>().ok()) {
        Some(d) => Value::Decimal(d),
        None => {
            warn!("Unparseable DECIMAL value, keeping the raw bytes");
            Value::Bytes(bytes)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn temporal_value(
    date_only: bool,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> Value {
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);

    if date_only {
        if let Some(date) = date {
            return Value::Date(date);
        }
        let text = format!("{year:04}-{month:02}-{day:02}");
        warn!("Unrepresentable date '{}', keeping it as text", text);
        return Value::String(text);
    }

    match date.and_then(|d| d.and_hms_micro_opt(hour as u32, minute as u32, second as u32, micros)) {
        Some(ts) => Value::Timestamp(ts),
        None => {
            let mut text =
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}");
            if micros > 0 {
                text.push_str(&format!(".{micros:06}"));
            }
            warn!("Unrepresentable timestamp '{}', keeping it as text", text);
            Value::String(text)
        }
    }
}

fn time_text(negative: bool, days: u32, hours: u8, minutes: u8, seconds: u8, micros: u32) -> String {
    let sign = if negative { "-" } else { "" };
    let hours = days as u64 * 24 + hours as u64;
    let mut text = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
    if micros > 0 {
        text.push_str(&format!(".{micros:06}"));
    }
    text
}
