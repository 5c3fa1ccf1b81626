//! Text report generation
//!
//! Renders a pin directory and project configurations as plain-text tables.

use pinmux_core::{Configuration, PinDirectory};
use std::fmt::Write;

/// Render the directory as one line per ball
///
/// The default function is marked with `*`; the selected function of
/// `config`, if any, is marked with `>`.
pub fn render_directory(directory: &PinDirectory, config: Option<&Configuration>) -> String {
    let balls = directory.ball_map();
    let width = balls.locations().map(str::len).max().unwrap_or(4).max(4);

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  FUNCTIONS", "BALL", width = width);
    for entry in balls.iter() {
        let selected = config.and_then(|c| c.get(&entry.location)).copied();
        let functions: Vec<String> = entry
            .functions()
            .map(|(index, signal)| {
                let mut mark = String::new();
                if Some(index) == selected {
                    mark.push('>');
                }
                if index == entry.default_function {
                    mark.push('*');
                }
                format!("{}[{}] {}", mark, index, signal)
            })
            .collect();
        let _ = writeln!(
            out,
            "{:<width$}  {}",
            entry.location,
            functions.join(", "),
            width = width
        );
    }
    out
}

/// Render directory and normalization statistics
pub fn render_stats(directory: &PinDirectory) -> String {
    let stats = directory.stats();
    let rows = directory.normalize_stats();

    let mut out = String::new();
    let _ = writeln!(out, "Pin Directory:");
    let _ = writeln!(out, "  Balls:     {}", stats.num_balls);
    let _ = writeln!(out, "  Signals:   {}", stats.num_signals);
    let _ = writeln!(out, "  Functions: {}", stats.num_functions);
    let _ = writeln!(out, "Rows:");
    let _ = writeln!(out, "  Read:            {}", rows.rows);
    let _ = writeln!(out, "  With signals:    {}", rows.signal_rows);
    let _ = writeln!(out, "  Orphaned:        {}", rows.orphan_rows);
    let _ = writeln!(out, "  Index fallbacks: {}", rows.index_fallbacks);
    let _ = writeln!(out, "  Overwritten:     {}", rows.index_collisions);
    let _ = writeln!(out, "  Defaults reset:  {}", rows.defaults_reset);
    out
}
