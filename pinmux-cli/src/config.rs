//! Configuration loading and parsing

use anyhow::{Context, Result};
use pinmux_core::{ProjectStore, TableConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "pinmux.toml";

/// Main application configuration (loaded from pinmux.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub table: TableConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory holding AP_<name>_PinList files
    #[serde(default = "default_ap_dir")]
    pub ap_dir: PathBuf,
    /// Directory holding <ap>/Project_<name>.json files
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
}

fn default_ap_dir() -> PathBuf {
    PathBuf::from("ap")
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("project")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ap_dir: default_ap_dir(),
            project_dir: default_project_dir(),
        }
    }
}

impl AppConfig {
    /// Project store over the configured directories
    pub fn store(&self) -> ProjectStore {
        ProjectStore::new(&self.paths.ap_dir, &self.paths.project_dir)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load the given config file, or `pinmux.toml` if present, or the defaults
pub fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            log::debug!("Using {} from working directory", DEFAULT_CONFIG_FILE);
            load_config(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => {
            log::debug!("No config file, using defaults");
            Ok(AppConfig::default())
        }
    }
}
