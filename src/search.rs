//! Lookups against the index.

use serde::Serialize;

use crate::error::Result;
use crate::index::{BinaryEntry, IndexStore};

/// How a query is compared with binary names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The name equals the query.
    Exact,
    /// The name contains the query.
    Similar,
}

/// Answers queries from an open index.
pub struct SearchEngine<'a> {
    store: &'a IndexStore,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a IndexStore) -> Self {
        Self { store }
    }

    /// Find entries for `bin`.
    pub fn search(&self, bin: &str, mode: MatchMode) -> Result<Vec<BinaryEntry>> {
        tracing::debug!("Searching for {:?} ({:?})", bin, mode);
        match mode {
            MatchMode::Exact => self.store.search_exact(bin),
            MatchMode::Similar => self.store.search_similar(bin),
        }
    }
}
