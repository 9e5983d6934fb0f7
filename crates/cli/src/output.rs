use crate::error::CliError;
use model::{metadata::description::Description, records::row::RowData};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

pub fn description_json(description: &Description) -> Result<String, CliError> {
    let tables: Vec<_> = description.tables().collect();
    Ok(serde_json::to_string_pretty(&tables)?)
}

pub async fn write_description(
    description: &Description,
    path: Option<String>,
) -> Result<(), CliError> {
    let json = description_json(description)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Writes rows as one JSON object per line.
pub struct RowWriter {
    out: Box<dyn Write>,
}

impl RowWriter {
    pub fn open(path: Option<&str>) -> Result<Self, CliError> {
        let out: Box<dyn Write> = match path {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(RowWriter { out })
    }

    pub fn write_row(&mut self, row: &RowData) -> Result<(), CliError> {
        serde_json::to_writer(&mut self.out, &row.to_json_map())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CliError> {
        self.out.flush()?;
        Ok(())
    }
}
