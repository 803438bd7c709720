//! Non-fatal problems recorded while building the index.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Where in the pipeline a warning arose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A module root could not be opened.
    Root,
    /// A module directory could not be opened.
    ModuleDirectory,
    /// A module file could not be read.
    ModuleFile,
    /// A directory entry could not be stat'd.
    Stat,
    /// A modulefile value failed to expand.
    Expansion,
    /// A path candidate directory could not be opened.
    Candidate,
    /// A binary entry could not be inserted.
    Insert,
}

/// One skipped item and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub path: PathBuf,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::Root => "couldn't open module root",
            WarningKind::ModuleDirectory => "couldn't open module dir",
            WarningKind::ModuleFile => "couldn't read module file",
            WarningKind::Stat => "stat() failed for",
            WarningKind::Expansion => "expansion failed in",
            WarningKind::Candidate => "couldn't open potential path",
            WarningKind::Insert => "couldn't add binary",
        };
        write!(f, "{} {}: {}", what, self.path.display(), self.message)
    }
}
