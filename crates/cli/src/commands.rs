use clap::{Args, Subcommand};
use connectors::sql::base::executor::DEFAULT_CHUNK_SIZE;

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    #[arg(long, help = "JSON file holding the connection settings")]
    pub config: Option<String>,

    #[arg(long, default_value = "127.0.0.1", help = "MySQL host")]
    pub host: String,

    #[arg(long, default_value_t = 3306, help = "MySQL port")]
    pub port: u16,

    #[arg(long, help = "User name")]
    pub user: Option<String>,

    #[arg(long, env = "KEYSCAN_PASSWORD", hide_env_values = true, help = "Password")]
    pub password: Option<String>,

    #[arg(long, help = "Database to describe and scan")]
    pub database: Option<String>,

    /// Session variable applied at connect time, e.g. `time_zone='+00:00'`.
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, help = "Maximum rows per chunk query")]
    pub chunk_size: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every table of the database with its columns and primary key
    Describe {
        #[arg(long, help = "If specified, writes the description to this file instead of stdout")]
        output: Option<String>,
    },
    /// Fetch a single chunk and print its rows as JSON lines
    Scan {
        #[arg(long, help = "Table to scan, as <table> or <schema>.<table>")]
        table: String,

        #[arg(long, help = "Cursor to resume after, as printed by a previous chunk summary")]
        cursor: Option<String>,
    },
    /// Fetch chunks until the table is exhausted
    Dump {
        #[arg(long, help = "Table to scan, as <table> or <schema>.<table>")]
        table: String,

        #[arg(long, help = "Cursor to resume after, as printed by a previous chunk summary")]
        cursor: Option<String>,

        #[arg(long, help = "If specified, writes rows to this file instead of stdout")]
        output: Option<String>,
    },
}
