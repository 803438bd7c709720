//! Tcl modulefiles (Environment Modules).
//!
//! Only a small, line-oriented subset is understood:
//!
//! ```text
//! #%Module1.0
//! set           root  /opt/gcc/12
//! prepend-path  PATH  $root/bin
//! append-path   PATH  {/opt/gcc/12/libexec}
//! ```
//!
//! `set` values are expanded and stored for later statements. PATH values
//! are expanded and recorded as candidates in file order; `prepend-path`
//! and `append-path` are not distinguished.

use std::path::Path;

use regex::Regex;

use crate::crawl::{Warning, WarningKind};
use crate::error::{LmcError, Result};
use crate::expand::Expander;

use super::{Dialect, DialectParser, ParseResult, PathCandidate};

/// First-line cookie identifying a Tcl modulefile.
pub const TCL_MAGIC: &str = "#%Module";

/// Parser for the Tcl dialect.
#[derive(Debug, Clone)]
pub struct TclParser {
    env_ref: Regex,
}

impl TclParser {
    pub fn new() -> Result<Self> {
        let env_ref = Regex::new(r"\$(?:::)?env\(([A-Za-z_][A-Za-z0-9_]*)\)").map_err(|e| {
            LmcError::Grammar {
                message: e.to_string(),
            }
        })?;
        Ok(Self { env_ref })
    }

    /// Rewrite Tcl-only value syntax into its shell equivalent.
    fn normalize(&self, value: &str) -> String {
        if let Some(inner) = value.strip_prefix('{').and_then(|v| v.strip_suffix('}')) {
            return format!("'{}'", inner.replace('\'', "'\\''"));
        }
        self.env_ref.replace_all(value, "$${$1}").into_owned()
    }
}

/// Split off the first blank-delimited token.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start_matches([' ', '\t']);
    match s.find([' ', '\t']) {
        Some(end) => (&s[..end], &s[end + 1..]),
        None => (s, ""),
    }
}

/// Skip `prepend-path`/`append-path` options ahead of the variable name.
fn skip_options(mut rest: &str) -> &str {
    loop {
        let (token, after) = next_token(rest);
        if !token.starts_with('-') {
            return rest;
        }
        rest = match token {
            "-d" | "--delim" => next_token(after).1,
            _ => after,
        };
    }
}

impl DialectParser for TclParser {
    fn dialect(&self) -> Dialect {
        Dialect::Tcl
    }

    fn detect(&self, content: &str) -> bool {
        content.starts_with(TCL_MAGIC)
    }

    fn parse(&self, content: &str, path: &Path, expander: &mut Expander) -> ParseResult {
        let mut result = ParseResult::new(Dialect::Tcl);

        for line in content.lines().skip(1) {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (command, rest) = next_token(line);
            match command {
                "set" => {
                    let (key, value) = next_token(rest);
                    let value = value.trim();
                    if key.is_empty() || value.is_empty() {
                        continue;
                    }

                    match expander.expand(&self.normalize(value)) {
                        Ok(expanded) => {
                            expander.set_variable(key, &expanded);
                            result.applied_variables.push((key.to_string(), expanded));
                        }
                        Err(e) => result.warnings.push(Warning::new(
                            WarningKind::Expansion,
                            path,
                            format!("set {} {}: {}", key, value, e),
                        )),
                    }
                }
                "prepend-path" | "append-path" => {
                    let (key, value) = next_token(skip_options(rest));
                    let value = value.trim();
                    if key != "PATH" || value.is_empty() {
                        continue;
                    }

                    match expander.expand(&self.normalize(value)) {
                        Ok(expanded) => result.candidates.push(PathCandidate {
                            value: expanded,
                            dialect: Dialect::Tcl,
                        }),
                        Err(e) => result.warnings.push(Warning::new(
                            WarningKind::Expansion,
                            path,
                            format!("{} value {}: {}", command, value, e),
                        )),
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            "Tcl parser pulled {} paths from {}",
            result.candidates.len(),
            path.display()
        );
        result
    }
}
