//! Workbook pin table reader (XLSX, XLSM, XLS, ODS)
//!
//! Uses calamine to read the cell grid of one worksheet. Cells keep the type
//! the spreadsheet stored them with; a function index typed into Excel usually
//! arrives as a float.

use super::{RawTable, TableSource};
use crate::config::TableConfig;
use crate::types::{CellValue, PinMuxError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Spreadsheet pin table source
pub struct WorkbookSource;

impl TableSource for WorkbookSource {
    fn read(path: &Path, config: &TableConfig) -> Result<RawTable> {
        log::info!("Reading workbook pin table: {:?}", path);

        // The workbook handle is dropped when this function returns
        let mut workbook = open_workbook_auto(path)?;

        let range = match config.sheet.as_deref() {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(PinMuxError::SheetNotFound(name.to_string()));
                }
                workbook.worksheet_range(name)?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| PinMuxError::SheetNotFound(format!("{:?} has no worksheets", path)))??,
        };

        log::debug!(
            "Worksheet size: {:?}, starting at {:?}",
            range.get_size(),
            range.start()
        );

        // calamine trims leading blank rows; put them back so row 1 stays the header
        let leading = range.start().map_or(0, |(row, _)| row as usize);
        let rows: Vec<Vec<CellValue>> = std::iter::repeat_with(Vec::<CellValue>::new)
            .take(leading)
            .chain(range.rows().map(|row| row.iter().map(cell_value).collect::<Vec<_>>()))
            .collect();

        Ok(RawTable::from_rows(rows))
    }
}

/// Convert a calamine cell into our cell model
pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s.clone()),
        Data::Int(v) => CellValue::Integer(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Boolean(*v),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_text(s.clone()),
        Data::Error(e) => {
            log::debug!("Treating cell error {:?} as empty", e);
            CellValue::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_records;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    const HEADER: [&str; 5] = [
        "Ball Name",
        "Ball Location",
        "Signal Name",
        "Function Index",
        "Default Function",
    ];

    /// Write a two-sheet pin table: "Pins" first, then "Alt"
    fn write_workbook(dir: &TempDir, header_row: u32) -> std::path::PathBuf {
        let path = dir.path().join("AP_X1000_PinList.xlsx");
        let mut workbook = Workbook::new();

        let pins = workbook.add_worksheet().set_name("Pins").unwrap();
        for (col, name) in HEADER.iter().enumerate() {
            pins.write_string(header_row, col as u16, *name).unwrap();
        }
        pins.write_string(header_row + 1, 0, "UART0").unwrap();
        pins.write_string(header_row + 1, 1, "A1").unwrap();
        pins.write_string(header_row + 1, 2, "UART_TX").unwrap();
        pins.write_number(header_row + 1, 3, 0.0).unwrap();
        pins.write_number(header_row + 1, 4, 1.0).unwrap();
        pins.write_string(header_row + 2, 2, "GPIO1").unwrap();
        pins.write_number(header_row + 2, 3, 1.0).unwrap();

        let alt = workbook.add_worksheet().set_name("Alt").unwrap();
        for (col, name) in HEADER.iter().enumerate() {
            alt.write_string(0, col as u16, *name).unwrap();
        }
        alt.write_string(1, 1, "B2").unwrap();
        alt.write_string(1, 2, "I2C_SDA").unwrap();
        alt.write_number(1, 3, 0.0).unwrap();
        alt.write_number(1, 4, 0.0).unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::String("A1".to_string())),
            CellValue::Text("A1".to_string())
        );
        assert_eq!(cell_value(&Data::Float(2.0)), CellValue::Float(2.0));
        assert_eq!(cell_value(&Data::Int(3)), CellValue::Integer(3));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Boolean(true));
    }

    #[test]
    fn test_missing_workbook_is_error() {
        let result = WorkbookSource::read(
            Path::new("/nonexistent/AP_TEST_PinList.xlsx"),
            &TableConfig::new(),
        );
        assert!(matches!(result, Err(PinMuxError::Workbook(_))));
    }

    #[test]
    fn test_reads_first_sheet_by_default() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, 0);

        let records = read_records(&path, &TableConfig::new()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ball_location, CellValue::Text("A1".to_string()));
        assert_eq!(records[0].function_index, CellValue::Float(0.0));
        assert_eq!(records[0].default_function, CellValue::Float(1.0));
        assert_eq!(records[1].ball_location, CellValue::Empty);
        assert_eq!(records[1].signal_name, CellValue::Text("GPIO1".to_string()));
    }

    #[test]
    fn test_reads_named_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, 0);

        let config = TableConfig::new().with_sheet("Alt");
        let records = read_records(&path, &config).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ball_location, CellValue::Text("B2".to_string()));
        assert_eq!(records[0].signal_name, CellValue::Text("I2C_SDA".to_string()));
    }

    #[test]
    fn test_unknown_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, 0);

        let config = TableConfig::new().with_sheet("Missing");
        let result = WorkbookSource::read(&path, &config);
        assert!(matches!(result, Err(PinMuxError::SheetNotFound(name)) if name == "Missing"));
    }

    #[test]
    fn test_blank_first_row_is_the_header() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir, 1);

        let table = WorkbookSource::read(&path, &TableConfig::new()).unwrap();
        assert!(table.header.is_empty());
        assert_eq!(table.rows.len(), 3);

        let result = read_records(&path, &TableConfig::new());
        assert!(matches!(result, Err(PinMuxError::MissingColumn(_))));
    }
}
