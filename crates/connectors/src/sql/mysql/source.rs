use crate::sql::{
    base::{error::DbError, source::SqlSource},
    mysql::{adapter::MySqlAdapter, config::ConnectionConfig},
};

pub type MySqlSource = SqlSource<MySqlAdapter>;

impl MySqlSource {
    /// Opens the connection. Scans issued through the source return at
    /// most `chunk_size` rows each.
    pub async fn init(config: &ConnectionConfig, chunk_size: usize) -> Result<Self, DbError> {
        let adapter = MySqlAdapter::connect(config).await?;
        Ok(SqlSource::new(adapter, chunk_size))
    }
}
