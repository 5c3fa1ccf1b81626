//! Inspect pin tables and report how their rows were interpreted
//!
//! Usage:
//!   inspect_pin_table <AP_X_PinList.xlsx> [more tables...] [--sheet <name>]

use pinmux_core::{PinDirectory, TableConfig};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut config = TableConfig::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--sheet" {
            match args.next() {
                Some(sheet) => config = config.with_sheet(sheet),
                None => {
                    eprintln!("--sheet needs a value");
                    return;
                }
            }
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    if paths.is_empty() {
        eprintln!("Usage: inspect_pin_table <pin table> [more tables...] [--sheet <name>]");
        return;
    }

    for path in paths {
        println!("\n═══════════════════════════════════════");
        println!("Inspecting: {:?}", path);
        println!("═══════════════════════════════════════");

        let directory = match PinDirectory::load(&path, &config) {
            Ok(d) => d,
            Err(e) => {
                println!("✗ Error: {}", e);
                continue;
            }
        };

        let rows = directory.normalize_stats();
        println!("Rows read:          {}", rows.rows);
        println!("Signal rows:        {}", rows.signal_rows);
        println!("Orphan rows:        {}", rows.orphan_rows);
        println!("Index fallbacks:    {}", rows.index_fallbacks);
        println!("Default fallbacks:  {}", rows.default_fallbacks);
        println!("Index collisions:   {}", rows.index_collisions);
        println!("Defaults reset:     {}", rows.defaults_reset);

        // Signals reachable from more than one ball are the ones that can clash
        let mut shared: Vec<(&str, usize)> = directory
            .signal_map()
            .iter()
            .filter(|(_, balls)| balls.len() > 1)
            .map(|(signal, balls)| (signal, balls.len()))
            .collect();
        shared.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        println!("\nShared signals (top 10):");
        println!("─────────────────────────");
        for (signal, count) in shared.iter().take(10) {
            println!("  {:<24} {:3} balls", signal, count);
        }

        let stats = directory.stats();
        println!(
            "\nTotal: {} balls, {} signals, {} functions",
            stats.num_balls, stats.num_signals, stats.num_functions
        );
    }
}
