//! Core types for the pin mux library
//!
//! This module defines the loosely-typed cell value read from a pin table, the
//! raw row shape handed to the normalizer, the persisted configuration types and
//! the library error enum.

use std::collections::BTreeMap;
use std::fmt;

/// Result type for pin mux operations
pub type Result<T> = std::result::Result<T, PinMuxError>;

/// A persisted pin mux plan: ball location -> selected function index
pub type Configuration = BTreeMap<String, i64>;

/// Live editor state: ball location -> currently selected signal name
pub type Selections = BTreeMap<String, String>;

/// Errors that can occur while reading, validating or storing pin data
#[derive(Debug, thiserror::Error)]
pub enum PinMuxError {
    #[error("Required column not found in header row: {0}")]
    MissingColumn(String),

    #[error("Unknown ball location: {0}")]
    UnknownBall(String),

    #[error("Invalid function index {index} for ball location '{ball}'")]
    InvalidFunctionIndex { ball: String, index: i64 },

    #[error("Worksheet not found: {0}")]
    SheetNotFound(String),

    #[error("Unsupported pin table format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid pin table file name '{0}' (expected AP_<name>_PinList.<ext>)")]
    InvalidFileName(String),

    #[error("Invalid project name: '{0}'")]
    InvalidProjectName(String),

    #[error("Project already exists: {0}")]
    ProjectExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single cell as read from a pin table, before any interpretation
///
/// Spreadsheet cells arrive as text, integers, floats or nothing at all, in any
/// combination. Every consumer goes through the coercions below instead of
/// guessing at the underlying type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent or empty cell
    #[default]
    Empty,
    /// Text cell (untrimmed, as stored)
    Text(String),
    /// Integer cell
    Integer(i64),
    /// Floating-point cell
    Float(f64),
    /// Boolean cell
    Boolean(bool),
}

impl CellValue {
    /// Build a cell from raw text, mapping the empty string to `Empty`
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text)
        }
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as a trimmed string, `None` if blank
    pub fn to_trimmed_string(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(match self {
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }

    /// Interpret the cell as an integer
    ///
    /// Accepts native numbers and text such as `"3"` or `"3.0"`. Fractional
    /// values are truncated toward zero. Returns `None` for blank cells,
    /// non-numeric text and non-finite floats.
    pub fn to_number(&self) -> Option<i64> {
        match self {
            CellValue::Empty => None,
            CellValue::Integer(v) => Some(*v),
            CellValue::Float(v) => float_to_i64(*v),
            CellValue::Boolean(v) => Some(if *v { 1 } else { 0 }),
            CellValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
            }
        }
    }
}

fn float_to_i64(v: f64) -> Option<i64> {
    if v.is_finite() && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(v) => write!(f, "{}", v),
            // Spreadsheets store "A1"-style numeric labels as 1.0
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.0}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Boolean(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
        }
    }
}

/// One data row of a pin table, restricted to the required columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Human readable ball name (informational only)
    pub ball_name: CellValue,
    /// Ball location; blank on carry-forward rows
    pub ball_location: CellValue,
    /// Signal routed to the ball by this row
    pub signal_name: CellValue,
    /// Function index of the signal
    pub function_index: CellValue,
    /// Default function of the ball
    pub default_function: CellValue,
}

impl RawRow {
    /// Build a row from text cells, mostly useful in tests and CSV input
    pub fn from_strs(
        ball_name: &str,
        ball_location: &str,
        signal_name: &str,
        function_index: &str,
        default_function: &str,
    ) -> Self {
        Self {
            ball_name: CellValue::from_text(ball_name),
            ball_location: CellValue::from_text(ball_location),
            signal_name: CellValue::from_text(signal_name),
            function_index: CellValue::from_text(function_index),
            default_function: CellValue::from_text(default_function),
        }
    }

    /// True if every cell of the row is blank
    pub fn is_blank(&self) -> bool {
        self.ball_name.is_blank()
            && self.ball_location.is_blank()
            && self.signal_name.is_blank()
            && self.function_index.is_blank()
            && self.default_function.is_blank()
    }
}
