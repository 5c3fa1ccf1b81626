//! Pin table readers (XLSX, CSV)
//!
//! This module turns a source file into a header row plus untyped data rows,
//! then resolves the required column names to positions so callers get one
//! [`RawRow`] per data row.

use crate::config::TableConfig;
use crate::types::{CellValue, PinMuxError, RawRow, Result};
use std::collections::HashMap;
use std::path::Path;

pub mod delimited;
pub mod workbook;

pub use delimited::CsvSource;
pub use workbook::WorkbookSource;

/// Header of the ball name column
pub const BALL_NAME: &str = "Ball Name";
/// Header of the ball location column
pub const BALL_LOCATION: &str = "Ball Location";
/// Header of the signal name column
pub const SIGNAL_NAME: &str = "Signal Name";
/// Header of the function index column
pub const FUNCTION_INDEX: &str = "Function Index";
/// Header of the default function column
pub const DEFAULT_FUNCTION: &str = "Default Function";

/// Every column a pin table must carry, in reporting order
pub const REQUIRED_COLUMNS: [&str; 5] = [
    BALL_NAME,
    BALL_LOCATION,
    SIGNAL_NAME,
    FUNCTION_INDEX,
    DEFAULT_FUNCTION,
];

/// File extensions handled by [`WorkbookSource`]
pub const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];
/// File extensions handled by [`CsvSource`]
pub const CSV_EXTENSIONS: [&str; 1] = ["csv"];

/// Common trait for all pin table sources
///
/// A source opens the file, reads every row and releases the file before
/// returning, whether or not the read succeeded.
pub trait TableSource {
    /// Read the whole table: first row is the header, the rest are data rows
    fn read(path: &Path, config: &TableConfig) -> Result<RawTable>;
}

/// A table as read from disk: header text plus untyped data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header cells rendered as text
    pub header: Vec<String>,
    /// Data rows below the header
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Split a list of rows into header and data rows
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows
            .remove(0)
            .iter()
            .map(|cell| cell.to_trimmed_string().unwrap_or_default())
            .collect();
        Self { header, rows }
    }

    /// Resolve the required columns and project every data row onto them
    pub fn records(&self) -> Result<Vec<RawRow>> {
        let columns = ColumnMap::resolve(&self.header)?;
        Ok(self.rows.iter().map(|cells| columns.project(cells)).collect())
    }
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub ball_name: usize,
    pub ball_location: usize,
    pub signal_name: usize,
    pub function_index: usize,
    pub default_function: usize,
}

impl ColumnMap {
    /// Resolve the required column names against a header row
    ///
    /// Matching is case-sensitive on the trimmed header text. If a name occurs
    /// more than once the leftmost column wins.
    pub fn resolve(header: &[String]) -> Result<Self> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            positions.entry(name.as_str()).or_insert(idx);
        }

        let find = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| PinMuxError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            ball_name: find(BALL_NAME)?,
            ball_location: find(BALL_LOCATION)?,
            signal_name: find(SIGNAL_NAME)?,
            function_index: find(FUNCTION_INDEX)?,
            default_function: find(DEFAULT_FUNCTION)?,
        })
    }

    /// Pick the required cells out of a data row; short rows yield `Empty`
    pub fn project(&self, cells: &[CellValue]) -> RawRow {
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        RawRow {
            ball_name: cell(self.ball_name),
            ball_location: cell(self.ball_location),
            signal_name: cell(self.signal_name),
            function_index: cell(self.function_index),
            default_function: cell(self.default_function),
        }
    }
}

/// Read a pin table and return its data rows
///
/// The format is chosen from the file extension.
pub fn read_records(path: &Path, config: &TableConfig) -> Result<Vec<RawRow>> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    let table = match extension.as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => {
            log::debug!("Detected workbook pin table");
            WorkbookSource::read(path, config)?
        }
        Some(ext) if CSV_EXTENSIONS.contains(&ext) => {
            log::debug!("Detected CSV pin table");
            CsvSource::read(path, config)?
        }
        _ => {
            return Err(PinMuxError::UnsupportedFormat(format!(
                "{:?}",
                path.file_name().unwrap_or_default()
            )))
        }
    };

    let records = table.records()?;
    log::info!("Read {} data rows from {:?}", records.len(), path);
    Ok(records)
}

/// True if the extension belongs to a supported pin table format
pub fn is_supported_extension(extension: &str) -> bool {
    let ext = extension.to_lowercase();
    WORKBOOK_EXTENSIONS.contains(&ext.as_str()) || CSV_EXTENSIONS.contains(&ext.as_str())
}
