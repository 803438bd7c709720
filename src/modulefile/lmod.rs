//! Lmod modulefiles (Lua).
//!
//! Lines are matched against a fixed statement grammar:
//!
//! ```text
//! prepend_path("PATH", "/opt/gcc/12/bin")
//! append_path('PATH', '/opt/gcc/12/libexec', ':')
//! ```
//!
//! The second argument is taken verbatim; Lua expressions such as
//! `pathJoin(base, "bin")` are not evaluated and never match.

use std::path::Path;

use regex::Regex;

use crate::error::{LmcError, Result};
use crate::expand::Expander;

use super::{Dialect, DialectParser, ParseResult, PathCandidate};

const STATEMENT: &str = concat!(
    r#"^\s*(prepend_path|append_path)\s*\(\s*(?:"PATH"|'PATH')\s*,\s*"#,
    r#"(?:"([^"]+)"|'([^']+)')\s*"#,
    r#"(?:,\s*(?:"[^"]*"|'[^']*')\s*)?\)\s*$"#,
);

/// Parser for the Lmod dialect.
#[derive(Debug, Clone)]
pub struct LmodParser {
    statement: Regex,
}

impl LmodParser {
    pub fn new() -> Result<Self> {
        let statement = Regex::new(STATEMENT).map_err(|e| LmcError::Grammar {
            message: e.to_string(),
        })?;
        Ok(Self { statement })
    }

    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.statement.captures(line)?;
        caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
    }
}

impl DialectParser for LmodParser {
    fn dialect(&self) -> Dialect {
        Dialect::Lmod
    }

    fn detect(&self, _content: &str) -> bool {
        true
    }

    fn parse(&self, content: &str, path: &Path, _expander: &mut Expander) -> ParseResult {
        let mut result = ParseResult::new(Dialect::Lmod);

        result.candidates.extend(content.lines().filter_map(|line| {
            self.extract(line).map(|value| PathCandidate {
                value: value.to_string(),
                dialect: Dialect::Lmod,
            })
        }));

        tracing::debug!(
            "Lmod parser pulled {} paths from {}",
            result.candidates.len(),
            path.display()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::VariableStore;

    fn parse(content: &str) -> Vec<String> {
        let mut exp = Expander::new(VariableStore::isolated());
        LmodParser::new()
            .unwrap()
            .parse(content, Path::new("/mods/gcc/12.lua"), &mut exp)
            .candidates
            .into_iter()
            .map(|c| c.value)
            .collect()
    }

    #[test]
    fn grammar_compiles() {
        assert!(LmodParser::new().is_ok());
    }

    #[test]
    fn matches_prepend_and_append() {
        let found = parse(
            "-- comment\nprepend_path(\"PATH\", \"/opt/gcc/bin\")\nappend_path(\"PATH\",\"/opt/gcc/sbin\")\n",
        );
        assert_eq!(found, vec!["/opt/gcc/bin", "/opt/gcc/sbin"]);
    }

    #[test]
    fn accepts_whitespace_and_delimiter_argument() {
        let found = parse("  prepend_path ( \"PATH\" , \"/a/bin\" , \":\" )  \r\n");
        assert_eq!(found, vec!["/a/bin"]);
    }

    #[test]
    fn accepts_single_quotes() {
        let found = parse("prepend_path('PATH', '/b/bin')\n");
        assert_eq!(found, vec!["/b/bin"]);
    }

    #[test]
    fn value_is_not_expanded() {
        let found = parse("prepend_path(\"PATH\", \"$HOME/bin\")\n");
        assert_eq!(found, vec!["$HOME/bin"]);
    }

    #[test]
    fn ignores_other_variables_and_expressions() {
        let found = parse(concat!(
            "prepend_path(\"MANPATH\", \"/man\")\n",
            "prepend_path(\"PATH\", pathJoin(base, \"bin\"))\n",
            "setenv(\"PATH\", \"/x\")\n",
            "prepend_path(\"PATH\", \"\")\n",
            "local x = 1 prepend_path(\"PATH\", \"/y\")\n",
        ));
        assert!(found.is_empty());
    }

    #[test]
    fn no_header_required() {
        let found = parse("prepend_path(\"PATH\", \"/only\")");
        assert_eq!(found, vec!["/only"]);
    }
}
