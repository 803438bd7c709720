//! Error types for lmc operations.
//!
//! This module defines [`LmcError`], the error type for failures that abort
//! a whole `build` or `search`, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `LmcError` is reserved for fatal conditions: the index cannot be opened,
//!   the rebuild transaction cannot begin or commit, the built-in grammar
//!   does not compile, or no data directory is usable
//! - Per-item problems (an unreadable module file, a failed expansion, a
//!   single failed insert) are [`Warning`](crate::crawl::Warning)s and never
//!   surface as an `LmcError`
//! - Use `anyhow::Error` (via `LmcError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lmc operations.
#[derive(Debug, Error)]
pub enum LmcError {
    /// The index database could not be opened or initialized.
    #[error("Failed to open index at {path}: {source}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement against the index failed.
    #[error("Index error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The rebuild transaction could not begin or commit.
    #[error("Transaction failed: {message}")]
    Transaction { message: String },

    /// The built-in modulefile grammar failed to compile.
    #[error("Failed to initialize modulefile grammar: {message}")]
    Grammar { message: String },

    /// No usable data directory could be found or created.
    #[error("No usable data directory: {message}")]
    DataDir { message: String },

    /// An explicitly requested settings file does not exist.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for lmc operations.
pub type Result<T> = std::result::Result<T, LmcError>;
