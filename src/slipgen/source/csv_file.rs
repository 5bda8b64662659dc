use super::RowSource;
use crate::error::Result;
use crate::model::Table;
use std::path::PathBuf;
use tracing::debug;

/// Rows from a local CSV file. The first record is the header row.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for CsvSource {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }

    fn fetch(&self) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(rows = rows.len(), path = %self.path.display(), "read CSV rows");
        Ok(Table::new(rows))
    }
}
