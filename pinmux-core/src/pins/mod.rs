//! Pin directory and pin table normalization
//!
//! This module turns raw pin table rows into the canonical ball map and its
//! reverse signal index.

pub mod directory;
pub mod index;
pub mod normalize;

// Re-export key types for convenience
pub use directory::{BallEntry, BallMap, DirectoryStats, PinDirectory, SignalIndex};
pub use index::build_signal_index;
pub use normalize::{normalize, NormalizeStats};
