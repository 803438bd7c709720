//! The optional user settings file.
//!
//! ```yaml
//! # ~/.config/lmc/config.yml
//! modulepath:
//!   - /opt/modulefiles
//!   - /sw/lmod/modules
//! data_dir: /scratch/me/lmc
//! case_sensitive: false
//! variable_scope: file
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crawl::VariableScope;
use crate::error::{LmcError, Result};

use super::paths::dedup_roots;

/// Module roots as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ModulePath {
    /// A list of roots; entries may themselves be colon-separated.
    List(Vec<String>),
    /// A colon-separated string, like `MODULEPATH`.
    Joined(String),
}

impl ModulePath {
    /// The roots in order, without empties or repeats.
    pub fn roots(&self) -> Vec<PathBuf> {
        match self {
            ModulePath::Joined(list) => dedup_roots(list.split(':')),
            ModulePath::List(items) => dedup_roots(items.iter().flat_map(|s| s.split(':'))),
        }
    }
}

/// Settings read from `config.yml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub modulepath: Option<ModulePath>,
    pub data_dir: Option<PathBuf>,
    pub verbose: bool,
    pub case_sensitive: bool,
    pub variable_scope: VariableScope,
}

/// Default settings file location, e.g. `~/.config/lmc/config.yml`.
pub fn default_settings_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("lmc").join("config.yml"))
}

/// Load settings.
///
/// With an explicit `path` the file must exist. Without one, the default
/// location is used if present and defaults apply otherwise.
///
/// # Errors
///
/// Returns `ConfigNotFound` if an explicit file is missing.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => load_settings_file(path),
        None => match default_settings_path() {
            Some(path) if path.is_file() => load_settings_file(&path),
            _ => Ok(Settings::default()),
        },
    }
}

/// Load one settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LmcError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LmcError::Io(e)
        }
    })?;
    tracing::debug!("Loaded settings from {}", path.display());
    parse_settings(&content, path)
}

/// Parse settings YAML. `source_path` is only used in errors.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| LmcError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
