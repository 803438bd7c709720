//! Index rows.

use std::fmt;

use serde::Serialize;

/// One executable provided by one module version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BinaryEntry {
    /// The module root, as configured.
    pub root: String,
    /// `<module>/<version>`, e.g. `gcc/12.2`.
    pub code: String,
    /// The executable's file name.
    pub bin: String,
}

impl BinaryEntry {
    pub fn new(root: impl Into<String>, code: impl Into<String>, bin: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            code: code.into(),
            bin: bin.into(),
        }
    }
}

impl fmt::Display for BinaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "root=\"{}\", code=\"{}\", bin=\"{}\"",
            self.root, self.code, self.bin
        )
    }
}
