//! CSV pin table reader
//!
//! Every cell of a delimited file is text; numeric interpretation is left to
//! the normalizer like any other loosely-typed cell.

use super::{RawTable, TableSource};
use crate::config::TableConfig;
use crate::types::{CellValue, Result};
use std::fs::File;
use std::path::Path;

/// Delimited text pin table source
pub struct CsvSource;

impl CsvSource {
    /// Read a table from any reader; the first record is the header
    pub fn from_reader<R: std::io::Read>(reader: R, config: &TableConfig) -> Result<RawTable> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(config.delimiter_byte())
            .from_reader(reader);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::from_text).collect());
        }

        Ok(RawTable::from_rows(rows))
    }
}

impl TableSource for CsvSource {
    fn read(path: &Path, config: &TableConfig) -> Result<RawTable> {
        log::info!("Reading CSV pin table: {:?}", path);
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }
}
