use crate::{
    commands::{Commands, ConnectionArgs},
    error::CliError,
    output::RowWriter,
    shutdown::ShutdownSignal,
};
use clap::Parser;
use connectors::sql::mysql::source::MySqlSource;
use model::{metadata::table::Table, pagination::cursor::Cursor};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "keyscan",
    version = "0.1.0",
    about = "Keyset-paginated MySQL table scanner"
)]
struct Cli {
    #[command(flatten)]
    conn: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout carries only JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = conn::resolve(&cli.conn).await?;
    let mut source = MySqlSource::init(&config, cli.conn.chunk_size).await?;

    let result = run(&mut source, &config.database, cli.command).await;
    let closed = source.close().await;
    result?;
    closed?;

    Ok(())
}

async fn run(source: &mut MySqlSource, database: &str, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Describe { output } => {
            let description = source.describe().await?;
            output::write_description(&description, output).await?;
        }
        Commands::Scan { table, cursor } => {
            let table = find_table(source, database, &table).await?;
            let cursor = parse_cursor(cursor.as_deref())?;

            let mut writer = RowWriter::open(None)?;
            let mut stream = source.scan(&table, &cursor).await?;
            let written = drain(&mut stream, &mut writer).await;
            let summary = stream.close().await?;
            written?;
            writer.flush()?;

            eprintln!("{}", serde_json::to_string(&summary)?);
        }
        Commands::Dump {
            table,
            cursor,
            output,
        } => {
            let table = find_table(source, database, &table).await?;
            let cursor = parse_cursor(cursor.as_deref())?;
            dump(source, &table, cursor, output.as_deref()).await?;
        }
    }

    Ok(())
}

async fn dump(
    source: &mut MySqlSource,
    table: &Table,
    mut cursor: Cursor,
    output: Option<&str>,
) -> Result<(), CliError> {
    let shutdown = ShutdownSignal::new();
    shutdown.register_handlers();

    let mut writer = RowWriter::open(output)?;
    let mut total = 0;
    let mut chunks = 0;

    loop {
        let mut stream = source.scan(table, &cursor).await?;
        let written = drain(&mut stream, &mut writer).await;
        let summary = stream.close().await?;
        written?;
        writer.flush()?;

        total += summary.row_count;
        chunks += 1;

        let Some(next) = summary.next_cursor() else {
            break;
        };
        cursor = next.clone();

        if shutdown.is_requested() {
            let resume = serde_json::to_string(&cursor)?;
            info!(cursor = %resume, "Dump interrupted, resume with --cursor");
            break;
        }
    }

    info!(table = %table, rows = total, chunks, "Dump finished");
    Ok(())
}

async fn drain(
    stream: &mut connectors::sql::base::executor::ChunkStream<'_>,
    writer: &mut RowWriter,
) -> Result<(), CliError> {
    while let Some(row) = stream.next().await? {
        writer.write_row(&row)?;
    }
    Ok(())
}

async fn find_table(source: &mut MySqlSource, database: &str, name: &str) -> Result<Table, CliError> {
    let (schema, table) = conn::parse_table_name(name, database)?;
    let description = source.describe().await?;
    description
        .table(&schema, &table)
        .cloned()
        .ok_or_else(|| CliError::UnknownTable(format!("{schema}.{table}")))
}

fn parse_cursor(raw: Option<&str>) -> Result<Cursor, CliError> {
    match raw {
        Some(raw) => Ok(serde_json::from_str(raw)?),
        None => Ok(Cursor::start()),
    }
}
