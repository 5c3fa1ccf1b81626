//! Table reader configuration types
//!
//! The column names of a pin table are fixed; what varies between sources is
//! where the table lives inside the file. This module holds those knobs.

use serde::{Deserialize, Serialize};

/// Configuration for reading a pin table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Worksheet to read from a workbook (default: first sheet)
    #[serde(default)]
    pub sheet: Option<String>,

    /// Field delimiter for CSV sources (default: ',')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: default_delimiter(),
        }
    }
}

impl TableConfig {
    /// Create a new table configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: read the named worksheet instead of the first one
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Builder method: set the CSV field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// CSV delimiter as a single byte, falling back to ',' for non-ASCII input
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            log::warn!(
                "Non-ASCII CSV delimiter {:?} is not supported, using ','",
                self.delimiter
            );
            b','
        }
    }
}
