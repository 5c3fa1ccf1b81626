//! Pin table normalization
//!
//! Pin tables come in two layouts:
//! - explicit: every row names its ball location
//! - carry-forward: only the first row of a ball's run names the location,
//!   the rows below it leave the cell blank
//!
//! Both are handled by one fold over the rows. The accumulator carries the
//! current ball location and the current default-function value; a row with
//! a blank location inherits them.
//!
//! Numeric cells are coerced leniently. An unreadable function index or
//! default function becomes `0` and the row is still used.

use crate::pins::directory::{BallEntry, BallMap};
use crate::types::RawRow;
use std::collections::{BTreeMap, HashMap};

/// Row-level counters collected while normalizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Data rows seen
    pub rows: usize,
    /// Rows that contributed a signal to a ball
    pub signal_rows: usize,
    /// Rows with a signal name but no ball location to attach it to
    pub orphan_rows: usize,
    /// Non-blank function index cells that were not numeric
    pub index_fallbacks: usize,
    /// Non-blank default function cells that were not numeric
    pub default_fallbacks: usize,
    /// Rows that replaced an earlier signal at the same function index
    pub index_collisions: usize,
    /// Balls whose default function was not among their indices
    pub defaults_reset: usize,
}

/// Signals collected for one ball during the fold
#[derive(Debug)]
struct BallGroup {
    location: String,
    /// Key: function index, Value: signal name
    functions: BTreeMap<i64, String>,
    pending_default: i64,
}

/// Accumulator threaded through the fold
#[derive(Debug, Default)]
struct Fold {
    current_ball: Option<String>,
    current_default: i64,
    groups: Vec<BallGroup>,
    /// Key: ball location, Value: index into `groups`
    lookup: HashMap<String, usize>,
    stats: NormalizeStats,
}

impl Fold {
    fn step(mut self, row: &RawRow) -> Self {
        self.stats.rows += 1;

        if let Some(location) = row.ball_location.to_trimmed_string() {
            if !row.default_function.is_blank() {
                self.current_default = row.default_function.to_number().unwrap_or_else(|| {
                    log::debug!(
                        "Default function {:?} of ball {} is not numeric, using 0",
                        row.default_function,
                        location
                    );
                    self.stats.default_fallbacks += 1;
                    0
                });
            }
            self.current_ball = Some(location);
        }

        let Some(signal) = row.signal_name.to_trimmed_string() else {
            return self;
        };

        let Some(location) = self.current_ball.clone() else {
            log::warn!("Signal {} appears before any ball location, skipping row", signal);
            self.stats.orphan_rows += 1;
            return self;
        };

        let function_index = if row.function_index.is_blank() {
            0
        } else {
            row.function_index.to_number().unwrap_or_else(|| {
                log::debug!(
                    "Function index {:?} of signal {} is not numeric, using 0",
                    row.function_index,
                    signal
                );
                self.stats.index_fallbacks += 1;
                0
            })
        };

        let current_default = self.current_default;
        let group = self.group_mut(location);
        group.pending_default = current_default;
        let collided = match group.functions.insert(function_index, signal) {
            Some(previous) => {
                log::debug!(
                    "Ball {} function {} redefined, replacing {}",
                    group.location,
                    function_index,
                    previous
                );
                true
            }
            None => false,
        };

        if collided {
            self.stats.index_collisions += 1;
        }
        self.stats.signal_rows += 1;

        self
    }

    fn group_mut(&mut self, location: String) -> &mut BallGroup {
        let idx = match self.lookup.get(&location) {
            Some(&idx) => idx,
            None => {
                self.lookup.insert(location.clone(), self.groups.len());
                self.groups.push(BallGroup {
                    location,
                    functions: BTreeMap::new(),
                    pending_default: 0,
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    fn finish(mut self) -> (BallMap, NormalizeStats) {
        let mut balls = BallMap::new();

        for group in self.groups {
            let default_function = if group.functions.contains_key(&group.pending_default) {
                group.pending_default
            } else {
                log::debug!(
                    "Default function {} of ball {} is not a listed function, using 0",
                    group.pending_default,
                    group.location
                );
                self.stats.defaults_reset += 1;
                0
            };

            let (function_indices, signals): (Vec<i64>, Vec<String>) =
                group.functions.into_iter().unzip();
            balls.insert(BallEntry {
                location: group.location,
                signals,
                default_function,
                function_indices,
            });
        }

        (balls, self.stats)
    }
}

/// Normalize raw pin table rows into the canonical ball map
///
/// Never fails: rows that cannot be interpreted are skipped or coerced, and
/// the returned statistics say how often that happened.
pub fn normalize(rows: &[RawRow]) -> (BallMap, NormalizeStats) {
    let (balls, stats) = rows.iter().fold(Fold::default(), Fold::step).finish();

    log::debug!(
        "Normalized {} rows into {} balls ({} signal rows, {} orphan rows, {} defaults reset)",
        stats.rows,
        balls.len(),
        stats.signal_rows,
        stats.orphan_rows,
        stats.defaults_reset
    );

    (balls, stats)
}
