//! Modulefile parsing.
//!
//! Two dialects are understood, each behind the [`DialectParser`] trait:
//!
//! - [`tcl`] - Environment Modules files, gated on the `#%Module` header
//! - [`lmod`] - Lmod Lua files, matched statement by statement
//!
//! The dialect is chosen by content, never by file extension. A file is
//! parsed as Tcl when it carries the Tcl header and as Lmod otherwise. A
//! Tcl file that contributes no PATH statements is not retried as Lmod.

pub mod lmod;
pub mod tcl;

pub use lmod::LmodParser;
pub use tcl::{TclParser, TCL_MAGIC};

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::crawl::{Warning, WarningKind};
use crate::error::Result;
use crate::expand::Expander;

/// Modulefile dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Tcl,
    Lmod,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Tcl => write!(f, "tcl"),
            Dialect::Lmod => write!(f, "lmod"),
        }
    }
}

/// A directory list that would be added to PATH when the module loads.
///
/// Tcl values have already been expanded; Lmod values are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCandidate {
    pub value: String,
    pub dialect: Dialect,
}

/// What one modulefile contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub dialect: Dialect,
    /// Candidates in file order.
    pub candidates: Vec<PathCandidate>,
    /// `set` statements applied to the variable store, in order.
    pub applied_variables: Vec<(String, String)>,
    /// Statements that were skipped.
    pub warnings: Vec<Warning>,
}

impl ParseResult {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            candidates: Vec::new(),
            applied_variables: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// One modulefile dialect.
pub trait DialectParser {
    /// The dialect this parser handles.
    fn dialect(&self) -> Dialect;

    /// Whether `content` belongs to this dialect.
    fn detect(&self, content: &str) -> bool;

    /// Extract PATH candidates, applying variable assignments to `expander`.
    fn parse(&self, content: &str, path: &Path, expander: &mut Expander) -> ParseResult;
}

/// Picks a dialect per file and parses it.
#[derive(Debug, Clone)]
pub struct ModuleFileParser {
    tcl: TclParser,
    lmod: LmodParser,
}

impl ModuleFileParser {
    /// Compile the built-in grammars.
    ///
    /// # Errors
    ///
    /// Returns `Grammar` if a built-in pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            tcl: TclParser::new()?,
            lmod: LmodParser::new()?,
        })
    }

    /// Dialect parsers in the order they are tried.
    fn dialects(&self) -> [&dyn DialectParser; 2] {
        [&self.tcl as &dyn DialectParser, &self.lmod]
    }

    /// Parse already-loaded modulefile content.
    pub fn parse_str(&self, content: &str, path: &Path, expander: &mut Expander) -> ParseResult {
        let parser = self
            .dialects()
            .into_iter()
            .find(|p| p.detect(content))
            .unwrap_or(&self.lmod as &dyn DialectParser);
        parser.parse(content, path, expander)
    }

    /// Read and parse a modulefile.
    ///
    /// Non-UTF-8 bytes are replaced rather than rejected.
    pub fn parse_file(
        &self,
        path: &Path,
        expander: &mut Expander,
    ) -> std::result::Result<ParseResult, Warning> {
        let bytes = fs::read(path)
            .map_err(|e| Warning::new(WarningKind::ModuleFile, path, e.to_string()))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(self.parse_str(&content, path, expander))
    }
}
