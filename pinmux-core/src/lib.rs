//! Pin Mux Core Library
//!
//! A reusable library for turning an application processor's pin table into a
//! canonical ball/signal directory and for checking pin mux configurations
//! against it.
//!
//! # Architecture
//!
//! The library is organised leaves first:
//! - `table` reads a pin table (XLSX/XLS/ODS/CSV) and resolves the required columns
//! - `pins` normalizes the rows into the ball map and derives the signal index
//! - `validate` checks configurations and detects duplicate signal selections
//! - `project` stores pin tables and saved configurations on disk
//!
//! The library does NOT:
//! - Render anything (see the pinmux-cli application)
//! - Keep state between calls; every directory is rebuilt from its pin table
//!
//! # Example Usage
//!
//! ```no_run
//! use pinmux_core::{find_duplicate_signal, validate_configuration, PinDirectory, TableConfig};
//! use std::path::Path;
//!
//! let directory = PinDirectory::load(
//!     Path::new("AP_X1000_PinList.xlsx"),
//!     &TableConfig::new(),
//! ).unwrap();
//!
//! // Start from the power-on defaults and check them
//! let config = directory.default_configuration();
//! validate_configuration(&config, directory.ball_map()).unwrap();
//!
//! // Would selecting UART_TX on ball B3 clash with another ball?
//! let selections = directory.selections(&config);
//! if let Some(other) = find_duplicate_signal("UART_TX", "B3", &selections) {
//!     println!("UART_TX is already routed to {}", other);
//! }
//! ```

// Public modules
pub mod config;
pub mod pins;
pub mod project;
pub mod table;
pub mod types;
pub mod validate;

// Re-export main types for convenience
pub use config::TableConfig;
pub use pins::{BallEntry, BallMap, DirectoryStats, NormalizeStats, PinDirectory, SignalIndex};
pub use project::{PinTableFile, ProjectFile, ProjectStore};
pub use types::{CellValue, Configuration, PinMuxError, RawRow, Result, Selections};
pub use validate::{find_duplicate_signal, validate_configuration, validate_entry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty table yields an empty directory
        let directory = PinDirectory::from_records(&[]);
        let stats = directory.stats();
        assert_eq!(stats.num_balls, 0);
        assert_eq!(stats.num_signals, 0);
    }
}
