use connectors::sql::base::error::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Db(#[from] DbError),

    #[error("Missing connection setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid table name '{0}', expected <table> or <schema>.<table>")]
    InvalidTable(String),

    #[error("Table '{0}' was not found in the database")]
    UnknownTable(String),
}
