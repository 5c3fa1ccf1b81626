//! Pin table and project file store
//!
//! Pin tables live in one directory as `AP_<name>_PinList.<ext>`. Projects
//! (saved configurations) live under `<project_dir>/<ap>/Project_<name>.json`
//! as a flat JSON object of ball location -> function index.

use crate::config::TableConfig;
use crate::pins::PinDirectory;
use crate::table::is_supported_extension;
use crate::types::{Configuration, PinMuxError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix of pin tables
pub const PIN_TABLE_PREFIX: &str = "AP_";
/// File stem suffix of pin tables
pub const PIN_TABLE_SUFFIX: &str = "_PinList";
/// File name prefix of project files
pub const PROJECT_PREFIX: &str = "Project_";
/// File extension of project files
pub const PROJECT_EXTENSION: &str = "json";

/// A pin table found in the table directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTableFile {
    /// AP name taken from the file name
    pub name: String,
    pub path: PathBuf,
}

/// A saved project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    /// Project name taken from the file name
    pub name: String,
    pub path: PathBuf,
}

/// Extract the AP name from a pin table file name (`AP_<name>_PinList.<ext>`)
pub fn pin_table_name(file_name: &str) -> Option<&str> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if !is_supported_extension(extension) {
        return None;
    }
    let name = stem
        .strip_prefix(PIN_TABLE_PREFIX)?
        .strip_suffix(PIN_TABLE_SUFFIX)?;
    is_valid_name(name).then_some(name)
}

/// Extract the project name from a project file name (`Project_<name>.json`)
pub fn project_name(file_name: &str) -> Option<&str> {
    let name = file_name
        .strip_suffix(PROJECT_EXTENSION)?
        .strip_suffix('.')?
        .strip_prefix(PROJECT_PREFIX)?;
    is_valid_name(name).then_some(name)
}

/// Names end up in file paths: no separators, no dot-only names
fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(PinMuxError::InvalidProjectName(name.to_string()))
    }
}

/// Read a configuration file
pub fn read_configuration(path: &Path) -> Result<Configuration> {
    let content = fs::read_to_string(path)?;
    let config: Configuration = serde_json::from_str(&content)?;
    Ok(config)
}

/// Write a configuration file (pretty-printed JSON)
pub fn write_configuration(path: &Path, config: &Configuration) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// File store for pin tables and projects
#[derive(Debug, Clone)]
pub struct ProjectStore {
    ap_dir: PathBuf,
    project_dir: PathBuf,
}

impl ProjectStore {
    /// Create a store over a pin table directory and a project directory
    pub fn new(ap_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            ap_dir: ap_dir.into(),
            project_dir: project_dir.into(),
        }
    }

    pub fn ap_dir(&self) -> &Path {
        &self.ap_dir
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Create both directories if they do not exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.ap_dir)?;
        fs::create_dir_all(&self.project_dir)?;
        Ok(())
    }

    /// List pin tables, sorted by AP name
    pub fn list_pin_tables(&self) -> Result<Vec<PinTableFile>> {
        if !self.ap_dir.exists() {
            return Ok(Vec::new());
        }

        let mut tables = Vec::new();
        for entry in fs::read_dir(&self.ap_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(name) = pin_table_name(file_name) {
                tables.push(PinTableFile {
                    name: name.to_string(),
                    path: path.clone(),
                });
            }
        }

        tables.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        Ok(tables)
    }

    /// Locate the pin table of an AP
    pub fn pin_table_path(&self, ap: &str) -> Result<PathBuf> {
        let mut matches = self
            .list_pin_tables()?
            .into_iter()
            .filter(|table| table.name == ap);

        let table = matches
            .next()
            .ok_or_else(|| PinMuxError::NotFound(format!("pin table for AP '{}'", ap)))?;
        if matches.next().is_some() {
            log::warn!("Several pin tables for AP '{}', using {:?}", ap, table.path);
        }
        Ok(table.path)
    }

    /// Read and normalize the pin table of an AP
    pub fn load_directory(&self, ap: &str, config: &TableConfig) -> Result<PinDirectory> {
        let path = self.pin_table_path(ap)?;
        PinDirectory::load(&path, config)
    }

    /// Copy a pin table into the table directory and create its project directory
    ///
    /// # Returns
    /// * `Result<String>` - the AP name taken from the file name
    pub fn import_pin_table(&self, source: &Path) -> Result<String> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PinMuxError::InvalidFileName(format!("{:?}", source)))?;
        let name = pin_table_name(file_name)
            .ok_or_else(|| PinMuxError::InvalidFileName(file_name.to_string()))?
            .to_string();

        fs::create_dir_all(&self.ap_dir)?;
        let target = self.ap_dir.join(file_name);
        // Copying a file onto itself truncates it
        if target.exists() && fs::canonicalize(source)? == fs::canonicalize(&target)? {
            log::info!("Pin table {:?} is already in the table directory", target);
        } else {
            fs::copy(source, &target)?;
        }
        fs::create_dir_all(self.project_dir.join(&name))?;

        log::info!("Imported pin table {:?} as AP '{}'", target, name);
        Ok(name)
    }

    /// Path of a project file
    pub fn project_path(&self, ap: &str, project: &str) -> Result<PathBuf> {
        check_name(ap)?;
        check_name(project)?;
        Ok(self.project_dir.join(ap).join(format!(
            "{}{}.{}",
            PROJECT_PREFIX, project, PROJECT_EXTENSION
        )))
    }

    /// List the projects of an AP, sorted by name
    pub fn list_projects(&self, ap: &str) -> Result<Vec<ProjectFile>> {
        check_name(ap)?;
        let dir = self.project_dir.join(ap);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(name) = project_name(file_name) {
                projects.push(ProjectFile {
                    name: name.to_string(),
                    path: path.clone(),
                });
            }
        }

        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    /// Load a saved project
    pub fn load_project(&self, ap: &str, project: &str) -> Result<Configuration> {
        let path = self.project_path(ap, project)?;
        if !path.exists() {
            return Err(PinMuxError::NotFound(format!(
                "project '{}' of AP '{}'",
                project, ap
            )));
        }

        log::debug!("Loading project {:?}", path);
        read_configuration(&path)
    }

    /// Save a project; an existing project is only replaced with `overwrite`
    pub fn save_project(
        &self,
        ap: &str,
        project: &str,
        config: &Configuration,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let path = self.project_path(ap, project)?;
        if path.exists() && !overwrite {
            return Err(PinMuxError::ProjectExists(project.to_string()));
        }

        write_configuration(&path, config)?;
        log::info!("Saved project {:?} ({} entries)", path, config.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ProjectStore {
        ProjectStore::new(dir.path().join("ap"), dir.path().join("project"))
    }

    fn sample_config() -> Configuration {
        let mut config = Configuration::new();
        config.insert("A1".to_string(), 0);
        config.insert("A2".to_string(), 1);
        config.insert("B1".to_string(), 2);
        config.insert("B2".to_string(), 0);
        config
    }

    #[test]
    fn test_pin_table_name() {
        assert_eq!(pin_table_name("AP_X1000_PinList.xlsx"), Some("X1000"));
        assert_eq!(pin_table_name("AP_X1000_PinList.CSV"), Some("X1000"));
        assert_eq!(pin_table_name("AP_X1000_PinList.txt"), None);
        assert_eq!(pin_table_name("X1000_PinList.xlsx"), None);
        assert_eq!(pin_table_name("AP__PinList.xlsx"), None);
        assert_eq!(pin_table_name("AP_X1000.xlsx"), None);
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name("Project_Board_A.json"), Some("Board_A"));
        assert_eq!(project_name("Project_.json"), None);
        assert_eq!(project_name("Board_A.json"), None);
        assert_eq!(project_name("Project_Board_A.toml"), None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let config = sample_config();

        store.save_project("X1000", "Board_A", &config, false).unwrap();
        let loaded = store.load_project("X1000", "Board_A").unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_overwrite_protection() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save_project("X1000", "Board_A", &sample_config(), false).unwrap();
        let err = store
            .save_project("X1000", "Board_A", &Configuration::new(), false)
            .unwrap_err();
        assert!(matches!(err, PinMuxError::ProjectExists(_)));

        store.save_project("X1000", "Board_A", &Configuration::new(), true).unwrap();
        assert!(store.load_project("X1000", "Board_A").unwrap().is_empty());
    }

    #[test]
    fn test_list_projects() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.list_projects("X1000").unwrap().is_empty());

        store.save_project("X1000", "Zeta", &sample_config(), false).unwrap();
        store.save_project("X1000", "Alpha", &sample_config(), false).unwrap();
        fs::write(store.project_dir().join("X1000").join("notes.txt"), "x").unwrap();

        let names: Vec<String> = store
            .list_projects("X1000")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_missing_project() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir).load_project("X1000", "Nope").unwrap_err();
        assert!(matches!(err, PinMuxError::NotFound(_)));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(matches!(
            store.project_path("X1000", "../escape"),
            Err(PinMuxError::InvalidProjectName(_))
        ));
        assert!(matches!(
            store.project_path("", "Board_A"),
            Err(PinMuxError::InvalidProjectName(_))
        ));
    }

    #[test]
    fn test_non_integer_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Project_Bad.json");
        fs::write(&path, r#"{"A1": "UART_TX"}"#).unwrap();

        assert!(matches!(read_configuration(&path), Err(PinMuxError::Json(_))));
    }

    #[test]
    fn test_import_and_list_pin_tables() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let source = dir.path().join("AP_X1000_PinList.csv");
        fs::write(
            &source,
            "Ball Name,Ball Location,Signal Name,Function Index,Default Function\n\
             UART,A1,UART_TX,0,0\n",
        )
        .unwrap();

        assert_eq!(store.import_pin_table(&source).unwrap(), "X1000");
        assert!(store.project_dir().join("X1000").is_dir());

        let tables = store.list_pin_tables().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "X1000");

        let directory = store.load_directory("X1000", &TableConfig::new()).unwrap();
        assert_eq!(directory.ball_map().len(), 1);

        let err = store.pin_table_path("Y2000").unwrap_err();
        assert!(matches!(err, PinMuxError::NotFound(_)));
    }

    #[test]
    fn test_import_table_already_in_place() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let content = "Ball Name,Ball Location,Signal Name,Function Index,Default Function\n\
                       UART,A1,UART_TX,0,0\n";

        fs::create_dir_all(store.ap_dir()).unwrap();
        let in_place = store.ap_dir().join("AP_X_PinList.csv");
        fs::write(&in_place, content).unwrap();

        assert_eq!(store.import_pin_table(&in_place).unwrap(), "X");
        assert_eq!(fs::read_to_string(&in_place).unwrap(), content);

        // Same file reached through a non-canonical path
        let dotted = store.ap_dir().join(".").join("AP_X_PinList.csv");
        assert_eq!(store.import_pin_table(&dotted).unwrap(), "X");
        assert_eq!(fs::read_to_string(&in_place).unwrap(), content);

        let directory = store.load_directory("X", &TableConfig::new()).unwrap();
        assert_eq!(directory.ball_map().len(), 1);
    }

    #[test]
    fn test_import_rejects_bad_file_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("pins.xlsx");
        fs::write(&source, "").unwrap();

        let err = store(&dir).import_pin_table(&source).unwrap_err();
        assert!(matches!(err, PinMuxError::InvalidFileName(_)));
    }
}
