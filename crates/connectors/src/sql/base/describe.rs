use crate::sql::base::{
    adapter::{RowStream, SqlAdapter},
    error::DbError,
};
use model::{
    core::{normalize::normalize_row, value::Value},
    metadata::{column::Column, description::Description},
    records::row::RowData,
};
use tracing::info;

pub const COL_TABLE_SCHEMA: &str = "table_schema";
pub const COL_TABLE_NAME: &str = "table_name";
pub const COL_COLUMN_NAME: &str = "column_name";
pub const COL_ORDINAL_POSITION: &str = "ordinal_position";
pub const COL_IS_PRIMARY_KEY: &str = "is_primary_key";
pub const COL_KEY_POSITION: &str = "key_position";

/// Builds a [`Description`] of every table in the current database from a
/// single catalog query.
#[derive(Debug, Clone, Default)]
pub struct SchemaDescriber;

impl SchemaDescriber {
    pub fn new() -> Self {
        SchemaDescriber
    }

    /// Fails without a partial result if the catalog query or any row
    /// fails.
    pub async fn describe<A>(&self, adapter: &mut A) -> Result<Description, DbError>
    where
        A: SqlAdapter + ?Sized,
    {
        let sql = adapter.catalog_sql();
        let mut rows = adapter.query_stream(sql, Vec::new()).await?;

        let collected = collect_columns(rows.as_mut()).await;
        let closed = rows.close().await;
        let description = collected?;
        closed?;

        info!(tables = description.len(), "Described database schema");
        Ok(description)
    }
}

async fn collect_columns(rows: &mut (dyn RowStream + '_)) -> Result<Description, DbError> {
    let mut description = Description::new();
    while let Some(row) = rows.next_row().await? {
        description.add_column(column_from_row(&normalize_row(row))?);
    }
    Ok(description)
}

pub fn column_from_row(row: &RowData) -> Result<Column, DbError> {
    let text = |name: &str| {
        row.get(name)
            .and_then(|f| f.value.as_string())
            .ok_or_else(|| DbError::Decode(format!("catalog row has no text value for '{name}'")))
    };

    let ordinal = row
        .get_value(COL_ORDINAL_POSITION)
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| DbError::Decode(format!("invalid '{COL_ORDINAL_POSITION}' in catalog row")))?;

    let is_primary_key = row
        .get_value(COL_IS_PRIMARY_KEY)
        .as_bool()
        .ok_or_else(|| DbError::Decode(format!("invalid '{COL_IS_PRIMARY_KEY}' in catalog row")))?;

    // Absent or NULL for columns outside the primary key.
    let key_position = match row.get_value(COL_KEY_POSITION) {
        Value::Null => None,
        value => Some(
            value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| DbError::Decode(format!("invalid '{COL_KEY_POSITION}' in catalog row")))?,
        ),
    };

    Ok(Column {
        schema: text(COL_TABLE_SCHEMA)?,
        table: text(COL_TABLE_NAME)?,
        name: text(COL_COLUMN_NAME)?,
        ordinal,
        is_primary_key,
        key_position,
    })
}
