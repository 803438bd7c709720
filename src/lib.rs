//! lmc - a lightweight module cache.
//!
//! lmc crawls environment-module trees (Tcl Environment Modules and Lmod),
//! finds every executable each module would put on `PATH`, and records
//! `(root, module code, binary)` rows in a SQLite index so you can ask
//! "which module provides `gcc`?" without loading anything.
//!
//! # Modules
//!
//! - [`build`] - Rebuilding the index from module roots
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings resolution and the data directory
//! - [`crawl`] - Module root traversal and executable discovery
//! - [`error`] - Error types and result aliases
//! - [`expand`] - Shell-style expansion of modulefile values
//! - [`index`] - The SQLite-backed binary index
//! - [`modulefile`] - Tcl and Lmod modulefile parsing
//! - [`search`] - Exact and substring lookups
//! - [`ui`] - Terminal output, spinners, and test doubles
//!
//! # Example
//!
//! ```
//! use lmc::build::{build_index, BuildOptions};
//! use lmc::expand::{Expander, VariableStore};
//! use lmc::index::IndexStore;
//! use lmc::search::{MatchMode, SearchEngine};
//!
//! let mut store = IndexStore::open_in_memory().unwrap();
//! let report = build_index(
//!     &mut store,
//!     &BuildOptions::default(),
//!     Expander::new(VariableStore::isolated()),
//! )
//! .unwrap();
//! assert_eq!(report.entries, 0);
//!
//! let hits = SearchEngine::new(&store).search("gcc", MatchMode::Exact).unwrap();
//! assert!(hits.is_empty());
//! ```
//!
//! For module trees on disk, see the integration tests.

pub mod build;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod expand;
pub mod index;
pub mod modulefile;
pub mod search;
pub mod ui;

pub use error::{LmcError, Result};
