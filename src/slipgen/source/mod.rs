//! # Row Sources
//!
//! A row source hands the driver one [`Table`]: a header row followed by data rows,
//! every cell a string. The [`RowSource`] trait keeps the driver independent of
//! where rows come from.
//!
//! ## Implementations
//!
//! - [`sheets::SheetsSource`]: Google Sheets, authenticated with a service-account
//!   key file
//! - [`csv_file::CsvSource`]: a local CSV file, first line is the header
//! - [`memory::InMemorySource`]: a fixed table, for tests
//!
//! Any error from `fetch` is treated by the driver as "no data": the run ends
//! without producing files.

use crate::error::Result;
use crate::model::Table;

pub mod csv_file;
pub mod memory;
pub mod sheets;

pub trait RowSource {
    /// Short human-readable description used in log lines.
    fn describe(&self) -> String;

    /// Fetch every row, header first.
    fn fetch(&self) -> Result<Table>;
}

impl<T: RowSource + ?Sized> RowSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> Result<Table> {
        (**self).fetch()
    }
}
