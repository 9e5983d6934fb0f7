use crate::sql::{
    base::{
        adapter::{RowStream, SqlAdapter},
        error::DbError,
    },
    mysql::{config::ConnectionConfig, params::MySqlParamStore, row::row_data},
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use mysql_async::{BinaryProtocol, Conn, QueryResult, prelude::Queryable};
use planner::query::dialect::{self, Dialect};
use tokio::time::timeout;
use tracing::info;

const QUERY_DESCRIBE_SQL: &str = include_str!("sql/describe.sql");

/// A single MySQL connection.
pub struct MySqlAdapter {
    conn: Conn,
    dialect: dialect::MySql,
}

impl MySqlAdapter {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, DbError> {
        config.validate()?;
        let options = config.driver_options()?;
        let connect_timeout = options.connect_timeout;
        let connecting = Conn::new(config.build_opts(options));

        let conn = match connect_timeout {
            Some(limit) => timeout(limit, connecting)
                .await
                .map_err(|_| DbError::ConnectTimeout(limit))?,
            None => connecting.await,
        }
        .map_err(DbError::Connectivity)?;

        info!(
            host = %config.hostname,
            port = config.port,
            database = %config.database,
            "Connected to MySQL"
        );

        Ok(MySqlAdapter {
            conn,
            dialect: dialect::MySql,
        })
    }
}

/// Rows of one prepared statement, read straight off the wire.
pub struct MySqlRowStream<'a> {
    result: Option<QueryResult<'a, 'static, BinaryProtocol>>,
}

#[async_trait]
impl RowStream for MySqlRowStream<'_> {
    async fn next_row(&mut self) -> Result<Option<RowData>, DbError> {
        let Some(result) = self.result.as_mut() else {
            return Ok(None);
        };

        let row = result.next().await.map_err(DbError::Query)?;
        Ok(row.as_ref().map(row_data))
    }

    async fn close(&mut self) -> Result<(), DbError> {
        if let Some(result) = self.result.take() {
            result.drop_result().await.map_err(DbError::Query)?;
        }
        Ok(())
    }
}

#[async_trait]
impl SqlAdapter for MySqlAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn catalog_sql(&self) -> &'static str {
        QUERY_DESCRIBE_SQL
    }

    async fn query_stream<'a>(
        &'a mut self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Box<dyn RowStream + 'a>, DbError> {
        let params = MySqlParamStore::from_values(&params).params();
        let result = self
            .conn
            .exec_iter(sql.to_string(), params)
            .await
            .map_err(DbError::Query)?;

        Ok(Box::new(MySqlRowStream {
            result: Some(result),
        }))
    }

    async fn disconnect(self) -> Result<(), DbError> {
        self.conn.disconnect().await.map_err(DbError::Connectivity)?;
        info!("Disconnected from MySQL");
        Ok(())
    }
}
