//! Canonical pin directory
//!
//! Holds the normalized ball map and its reverse signal index. Both keep the
//! order in which keys were first seen in the source table, so a serialized
//! directory lists balls the way the table does.

use crate::config::TableConfig;
use crate::pins::index::build_signal_index;
use crate::pins::normalize::{normalize, NormalizeStats};
use crate::types::{Configuration, RawRow, Result, Selections};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::path::Path;

/// One ball and the signals it can carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallEntry {
    /// Ball location (map key)
    pub location: String,
    /// Signal names ordered by ascending function index
    pub signals: Vec<String>,
    /// Function index selected at power-on (one of `function_indices`, or 0)
    pub default_function: i64,
    /// Function indices observed in the source, parallel to `signals`
    pub function_indices: Vec<i64>,
}

impl BallEntry {
    /// True if the source listed a signal for this function index
    pub fn has_function(&self, index: i64) -> bool {
        self.function_indices.binary_search(&index).is_ok()
    }

    /// Signal routed to the ball when `index` is selected
    pub fn signal_for(&self, index: i64) -> Option<&str> {
        self.function_indices
            .binary_search(&index)
            .ok()
            .map(|pos| self.signals[pos].as_str())
    }

    /// Signal routed to the ball at power-on
    pub fn default_signal(&self) -> Option<&str> {
        self.signal_for(self.default_function)
    }

    /// Iterate over `(function index, signal name)` pairs in index order
    pub fn functions(&self) -> impl Iterator<Item = (i64, &str)> {
        self.function_indices
            .iter()
            .copied()
            .zip(self.signals.iter().map(String::as_str))
    }
}

impl Serialize for BallEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BallEntry", 2)?;
        state.serialize_field("signals", &self.signals)?;
        state.serialize_field("default_function", &self.default_function)?;
        state.end()
    }
}

/// Ball location -> entry, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BallMap {
    entries: Vec<BallEntry>,
    /// Key: ball location, Value: index into `entries`
    lookup: HashMap<String, usize>,
}

impl BallMap {
    /// Create an empty ball map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing an existing entry for the same location in place
    pub fn insert(&mut self, entry: BallEntry) {
        match self.lookup.get(&entry.location) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.lookup.insert(entry.location.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Look up a ball by location
    pub fn get(&self, location: &str) -> Option<&BallEntry> {
        self.lookup.get(location).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, location: &str) -> bool {
        self.lookup.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &BallEntry> {
        self.entries.iter()
    }

    /// Ball locations in first-seen order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.location.as_str())
    }
}

impl Serialize for BallMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.location, entry)?;
        }
        map.end()
    }
}

/// Signal name -> ball locations exposing it, both in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalIndex {
    entries: Vec<(String, Vec<String>)>,
    /// Key: signal name, Value: index into `entries`
    lookup: HashMap<String, usize>,
}

impl SignalIndex {
    /// Create an empty signal index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `ball` exposes `signal`; duplicates and empty names are ignored
    pub fn add(&mut self, signal: &str, ball: &str) {
        if signal.is_empty() {
            return;
        }
        let idx = match self.lookup.get(signal) {
            Some(&idx) => idx,
            None => {
                self.lookup.insert(signal.to_string(), self.entries.len());
                self.entries.push((signal.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let balls = &mut self.entries[idx].1;
        if !balls.iter().any(|b| b == ball) {
            balls.push(ball.to_string());
        }
    }

    /// Balls that can carry `signal` (empty if the signal is unknown)
    pub fn balls_for(&self, signal: &str) -> &[String] {
        self.lookup
            .get(signal)
            .map(|&idx| self.entries[idx].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, signal: &str) -> bool {
        self.lookup.contains_key(signal)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(signal, balls)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(signal, balls)| (signal.as_str(), balls.as_slice()))
    }
}

impl Serialize for SignalIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (signal, balls) in &self.entries {
            map.serialize_entry(signal, balls)?;
        }
        map.end()
    }
}

/// The canonical directory built from one pin table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinDirectory {
    balls: BallMap,
    signals: SignalIndex,
    normalize_stats: NormalizeStats,
}

impl PinDirectory {
    /// Read a pin table from disk and build its directory
    ///
    /// # Arguments
    /// * `path` - Path to the pin table (XLSX/XLS/ODS/CSV)
    /// * `config` - Table reader configuration
    ///
    /// # Returns
    /// * `Result<PinDirectory>` - Err only if the file cannot be read or a required column is missing
    ///
    /// # Example
    /// ```no_run
    /// use pinmux_core::{PinDirectory, TableConfig};
    /// use std::path::Path;
    ///
    /// let directory = PinDirectory::load(Path::new("AP_X1_PinList.xlsx"), &TableConfig::new()).unwrap();
    /// println!("{} balls", directory.ball_map().len());
    /// ```
    pub fn load(path: &Path, config: &TableConfig) -> Result<Self> {
        log::info!("Loading pin table: {:?}", path);

        let records = crate::table::read_records(path, config)?;
        let directory = Self::from_records(&records);

        let stats = directory.stats();
        log::info!(
            "Pin table loaded: {} balls, {} signals, {} functions",
            stats.num_balls,
            stats.num_signals,
            stats.num_functions
        );
        Ok(directory)
    }

    /// Build a directory from already-read rows
    pub fn from_records(records: &[RawRow]) -> Self {
        let (balls, normalize_stats) = normalize(records);
        let signals = build_signal_index(&balls);
        Self {
            balls,
            signals,
            normalize_stats,
        }
    }

    /// Ball location -> signals and default function
    pub fn ball_map(&self) -> &BallMap {
        &self.balls
    }

    /// Signal name -> ball locations
    pub fn signal_map(&self) -> &SignalIndex {
        &self.signals
    }

    /// Row-level statistics from normalization
    pub fn normalize_stats(&self) -> &NormalizeStats {
        &self.normalize_stats
    }

    /// Selections implied by a configuration: ball -> selected signal name
    ///
    /// Entries that do not resolve to a signal are left out.
    pub fn selections(&self, config: &Configuration) -> Selections {
        config
            .iter()
            .filter_map(|(ball, &index)| {
                let signal = self.balls.get(ball).and_then(|entry| entry.signal_for(index));
                if signal.is_none() {
                    log::warn!("No signal for ball {} at function index {}", ball, index);
                }
                signal.map(|s| (ball.clone(), s.to_string()))
            })
            .collect()
    }

    /// Configuration that selects every ball's default function
    pub fn default_configuration(&self) -> Configuration {
        self.balls
            .iter()
            .map(|entry| (entry.location.clone(), entry.default_function))
            .collect()
    }

    /// Get directory statistics
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            num_balls: self.balls.len(),
            num_signals: self.signals.len(),
            num_functions: self.balls.iter().map(|e| e.signals.len()).sum(),
        }
    }
}

impl Serialize for PinDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PinDirectory", 2)?;
        state.serialize_field("ball_map", &self.balls)?;
        state.serialize_field("signal_map", &self.signals)?;
        state.end()
    }
}

/// Directory statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Number of balls with at least one signal
    pub num_balls: usize,
    /// Number of distinct signal names
    pub num_signals: usize,
    /// Total number of (ball, function) pairs
    pub num_functions: usize,
}
