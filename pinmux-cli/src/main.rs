//! Pin Mux Configurator CLI Application
//!
//! This is the command-line interface for the pin mux configurator.
//! It uses the pinmux-core library and adds:
//! - Pin table import and listing
//! - Project (saved configuration) management
//! - Validation and duplicate signal checks on edits
//! - Text and JSON reports

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pinmux_core::{
    find_duplicate_signal, validate_configuration, validate_entry, PinDirectory, PinMuxError,
};
use std::path::PathBuf;

mod config;
mod report;

use config::AppConfig;

/// Pin Mux Configurator - select and save per-ball functions of an AP pin table
#[derive(Parser, Debug)]
#[command(name = "pinmux-cli")]
#[command(about = "Select, validate and save per-ball pin functions", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (default: ./pinmux.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available pin tables
    Tables,

    /// Import a pin table named AP_<name>_PinList.<xlsx|xls|ods|csv>
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the ball/signal directory of an AP
    Show {
        ap: String,
        /// Print the canonical ball_map/signal_map JSON
        #[arg(long)]
        json: bool,
        /// Mark the selections of this project
        #[arg(long)]
        project: Option<String>,
    },

    /// List saved projects of an AP
    Projects { ap: String },

    /// Print a saved project as JSON
    Load { ap: String, project: String },

    /// Validate a configuration JSON file and save it as a project
    Save {
        ap: String,
        project: String,
        #[arg(value_name = "CONFIG_JSON")]
        file: PathBuf,
        /// Replace an existing project
        #[arg(long)]
        overwrite: bool,
    },

    /// Validate a saved project against the AP's pin table
    Validate { ap: String, project: String },

    /// Check whether selecting SIGNAL on BALL clashes with another ball
    Check {
        ap: String,
        ball: String,
        signal: String,
        /// Working selections come from this project (default: power-on defaults)
        #[arg(long)]
        project: Option<String>,
    },

    /// Set one ball's function index in a project, creating it from defaults if needed
    Set {
        ap: String,
        project: String,
        ball: String,
        index: i64,
        /// Save even if another ball already selects the same signal
        #[arg(long)]
        allow_duplicate: bool,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Pin Mux Configurator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using core library v{}", pinmux_core::VERSION);

    let app = config::resolve_config(args.config.as_deref())?;
    run(&app, args.command)
}

fn run(app: &AppConfig, command: Command) -> Result<()> {
    let store = app.store();

    match command {
        Command::Tables => {
            let tables = store.list_pin_tables()?;
            if tables.is_empty() {
                println!("No pin tables in {:?}", store.ap_dir());
            }
            for table in tables {
                println!("{:<16} {}", table.name, table.path.display());
            }
        }

        Command::Import { file } => {
            let ap = store
                .import_pin_table(&file)
                .with_context(|| format!("Failed to import {:?}", file))?;
            // Parse once so a broken table is reported at import time
            let directory = load_directory(app, &ap)?;
            println!("Imported AP '{}' ({} balls)", ap, directory.ball_map().len());
        }

        Command::Show { ap, json, project } => {
            let directory = load_directory(app, &ap)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&directory)?);
            } else {
                let config = match project {
                    Some(project) => Some(load_project(app, &ap, &project)?),
                    None => None,
                };
                print!("{}", report::render_directory(&directory, config.as_ref()));
                println!();
                print!("{}", report::render_stats(&directory));
            }
        }

        Command::Projects { ap } => {
            for project in store.list_projects(&ap)? {
                let modified = std::fs::metadata(&project.path)
                    .and_then(|m| m.modified())
                    .map(|t| {
                        chrono::DateTime::<chrono::Local>::from(t)
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                    })
                    .unwrap_or_else(|_| "-".to_string());
                println!("{:<24} {}", project.name, modified);
            }
        }

        Command::Load { ap, project } => {
            let config = load_project(app, &ap, &project)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Command::Save {
            ap,
            project,
            file,
            overwrite,
        } => {
            let config = pinmux_core::project::read_configuration(&file)
                .with_context(|| format!("Failed to read configuration {:?}", file))?;
            if config.is_empty() {
                bail!("Configuration {:?} is empty", file);
            }

            let directory = load_directory(app, &ap)?;
            validate_configuration(&config, directory.ball_map())
                .with_context(|| format!("Configuration {:?} does not match AP '{}'", file, ap))?;

            let path = store.save_project(&ap, &project, &config, overwrite)?;
            println!("Saved project '{}' to {}", project, path.display());
        }

        Command::Validate { ap, project } => {
            let directory = load_directory(app, &ap)?;
            let config = load_project(app, &ap, &project)?;
            validate_configuration(&config, directory.ball_map())
                .with_context(|| format!("Project '{}' is not valid for AP '{}'", project, ap))?;
            println!("Project '{}' is valid ({} balls configured)", project, config.len());
        }

        Command::Check {
            ap,
            ball,
            signal,
            project,
        } => {
            let directory = load_directory(app, &ap)?;
            let config = match project {
                Some(project) => load_project(app, &ap, &project)?,
                None => directory.default_configuration(),
            };
            let selections = directory.selections(&config);

            match find_duplicate_signal(&signal, &ball, &selections) {
                Some(other) => println!("Duplicate: {} is already selected on ball {}", signal, other),
                None => println!("No conflict: {} can be selected on ball {}", signal, ball),
            }
        }

        Command::Set {
            ap,
            project,
            ball,
            index,
            allow_duplicate,
        } => {
            let directory = load_directory(app, &ap)?;
            let mut config = match store.load_project(&ap, &project) {
                Ok(config) => config,
                Err(PinMuxError::NotFound(_)) => {
                    log::info!("Project '{}' does not exist, starting from defaults", project);
                    directory.default_configuration()
                }
                Err(e) => return Err(e.into()),
            };

            validate_entry(&ball, index, directory.ball_map())?;
            let signal = directory
                .ball_map()
                .get(&ball)
                .and_then(|entry| entry.signal_for(index))
                .context("validated entry has no signal")?
                .to_string();

            let selections = directory.selections(&config);
            if let Some(other) = find_duplicate_signal(&signal, &ball, &selections) {
                if allow_duplicate {
                    log::warn!("{} is also selected on ball {}", signal, other);
                } else {
                    bail!(
                        "{} is already selected on ball {} (use --allow-duplicate to save anyway)",
                        signal,
                        other
                    );
                }
            }

            config.insert(ball.clone(), index);
            store.save_project(&ap, &project, &config, true)?;
            println!("{}: [{}] {} saved to project '{}'", ball, index, signal, project);
        }
    }

    Ok(())
}

fn load_directory(app: &AppConfig, ap: &str) -> Result<PinDirectory> {
    app.store()
        .load_directory(ap, &app.table)
        .with_context(|| format!("Failed to load pin table of AP '{}'", ap))
}

fn load_project(app: &AppConfig, ap: &str, project: &str) -> Result<pinmux_core::Configuration> {
    app.store()
        .load_project(ap, project)
        .with_context(|| format!("Failed to load project '{}' of AP '{}'", project, ap))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
