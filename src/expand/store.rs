//! The variable store consulted during expansion.

use std::collections::HashMap;

/// Key/value mapping consulted by `$NAME` and `${NAME}` substitutions.
///
/// A store built with [`VariableStore::from_env`] is seeded from the process
/// environment and falls back to it for keys it does not hold, so variables
/// exported after seeding are still visible. Entries that are not valid
/// UTF-8 are skipped. Writes never touch the process environment.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: HashMap<String, String>,
    env_fallback: bool,
}

impl VariableStore {
    /// Create a store seeded from the process environment.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(key, value)| {
                    Some((key.into_string().ok()?, value.into_string().ok()?))
                })
                .collect(),
            env_fallback: true,
        }
    }

    /// Create an empty store that never consults the process environment.
    pub fn isolated() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a variable, falling back to the process environment.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.vars.get(key) {
            Some(value) => Some(value.clone()),
            None if self.env_fallback => std::env::var_os(key)?.into_string().ok(),
            None => None,
        }
    }

    /// Set a variable for all subsequent lookups on this store.
    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    /// The directory `~` expands to.
    pub fn home(&self) -> Option<String> {
        self.get("HOME").filter(|h| !h.is_empty()).or_else(|| {
            if self.env_fallback {
                dirs::home_dir().map(|p| p.to_string_lossy().into_owned())
            } else {
                None
            }
        })
    }

    /// Number of variables held directly by the store.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the store holds no variables of its own.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
