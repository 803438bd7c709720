//! The persistent binary index.
//!
//! - [`BinaryEntry`] - one `(root, code, bin)` row
//! - [`IndexStore`] - the SQLite database holding those rows
//! - [`Rebuild`] - a transaction that replaces the whole index at once
//! - [`EntrySink`] - where the crawler sends entries

pub mod entry;
pub mod store;

pub use entry::BinaryEntry;
pub use store::{BuildInfo, EntrySink, IndexStore, Rebuild, DB_FILE_NAME};
