//! Shell-style expansion of modulefile values.
//!
//! Values found in modulefiles are expanded the way a POSIX shell expands a
//! word list: tilde expansion, then parameter substitution against a
//! [`VariableStore`], then filename patterns. All resulting fields are
//! concatenated with no separator, so `a b` expands to `ab`.
//!
//! # Example
//!
//! ```
//! use lmc::expand::{Expander, VariableStore};
//!
//! let mut expander = Expander::new(VariableStore::isolated());
//! expander.set_variable("root", "/opt/gcc");
//! assert_eq!(expander.expand("$root/bin").unwrap(), "/opt/gcc/bin");
//! ```

pub mod glob;
pub mod store;
pub mod words;

pub use store::VariableStore;
pub use words::{split_words, Word};

use thiserror::Error;

/// Why a value could not be expanded.
///
/// Expansion failures are local to one statement; callers skip the
/// statement and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// A quote was opened and never closed.
    #[error("unbalanced {0} quote")]
    UnbalancedQuote(char),

    /// A `${` was never closed.
    #[error("unterminated ${{...}} substitution")]
    UnterminatedBrace,

    /// `${...}` held something other than a variable name.
    #[error("bad substitution: ${{{0}}}")]
    BadSubstitution(String),

    /// An unquoted shell metacharacter.
    #[error("illegal character {0:?}")]
    BadCharacter(char),

    /// `$(...)` or backticks.
    #[error("command substitution is not supported")]
    CommandSubstitution,

    /// A backslash with nothing after it.
    #[error("trailing backslash")]
    TrailingBackslash,

    /// A filename pattern that does not compile.
    #[error("invalid pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },
}

/// Expands raw strings against a mutable variable store.
#[derive(Debug, Clone, Default)]
pub struct Expander {
    vars: VariableStore,
}

impl Expander {
    /// Create an expander over the given store.
    pub fn new(vars: VariableStore) -> Self {
        Self { vars }
    }

    /// Create an expander seeded from the process environment.
    pub fn from_env() -> Self {
        Self::new(VariableStore::from_env())
    }

    /// The underlying variable store.
    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    /// Set a variable, visible to every later expansion on this expander.
    pub fn set_variable(&mut self, key: &str, value: &str) {
        self.vars.set(key, value);
    }

    /// Expand `raw` into a single string.
    pub fn expand(&self, raw: &str) -> Result<String, ExpansionError> {
        let mut out = String::new();
        for word in split_words(raw, &self.vars)? {
            for field in glob::expand_word(&word)? {
                out.push_str(&field);
            }
        }
        Ok(out)
    }
}
