//! Configuration resolution for lmc.
//!
//! Each setting is taken from the first source that provides it:
//!
//! 1. Command-line flags
//! 2. Environment (`MODULEPATH` for module roots)
//! 3. The settings file (`<config_dir>/lmc/config.yml`, see [`settings`])
//! 4. Built-in defaults
//!
//! The data directory is resolved separately by [`resolve_data_dir`], since
//! only commands that touch the index need one.
//!
//! # Example
//!
//! ```
//! use lmc::config::{Config, ConfigOverrides, Settings};
//! use std::path::PathBuf;
//!
//! let overrides = ConfigOverrides::default();
//! let config = Config::resolve(&overrides, Some("/opt/mods::/sw/mods"), &Settings::default());
//! assert_eq!(
//!     config.module_roots,
//!     vec![PathBuf::from("/opt/mods"), PathBuf::from("/sw/mods")]
//! );
//! ```

pub mod paths;
pub mod settings;

pub use paths::{parse_module_roots, prepare_dir, resolve_data_dir, resolve_data_dir_from};
pub use settings::{
    default_settings_path, load_settings, load_settings_file, parse_settings, ModulePath, Settings,
};

use std::path::{Path, PathBuf};

use crate::crawl::VariableScope;
use crate::error::Result;

/// Environment variable holding the default module roots.
pub const MODULEPATH_ENV: &str = "MODULEPATH";

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub modulepath: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub verbose: bool,
    pub case_sensitive: bool,
    pub variable_scope: Option<VariableScope>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub module_roots: Vec<PathBuf>,
    /// Requested data directory, before fallbacks.
    pub data_dir: Option<PathBuf>,
    pub verbose: bool,
    pub case_sensitive: bool,
    pub variable_scope: VariableScope,
}

impl Config {
    /// Combine the sources in precedence order.
    pub fn resolve(
        overrides: &ConfigOverrides,
        env_modulepath: Option<&str>,
        settings: &Settings,
    ) -> Self {
        let env_modulepath = env_modulepath.filter(|s| !s.is_empty());
        let module_roots = match (&overrides.modulepath, env_modulepath, &settings.modulepath) {
            (Some(list), _, _) => parse_module_roots(list),
            (None, Some(list), _) => parse_module_roots(list),
            (None, None, Some(configured)) => configured.roots(),
            (None, None, None) => Vec::new(),
        };

        Self {
            module_roots,
            data_dir: overrides.data_dir.clone().or_else(|| settings.data_dir.clone()),
            verbose: overrides.verbose || settings.verbose,
            case_sensitive: overrides.case_sensitive || settings.case_sensitive,
            variable_scope: overrides.variable_scope.unwrap_or(settings.variable_scope),
        }
    }

    /// Load the settings file and resolve against the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `settings_path` is given but missing, or if the settings
    /// file is invalid.
    pub fn load(overrides: &ConfigOverrides, settings_path: Option<&Path>) -> Result<Self> {
        let settings = load_settings(settings_path)?;
        let env = std::env::var(MODULEPATH_ENV).ok();
        Ok(Self::resolve(overrides, env.as_deref(), &settings))
    }
}
