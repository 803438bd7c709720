//! Walking module roots.
//!
//! A module root holds one directory per module, and each module directory
//! holds one modulefile per version:
//!
//! ```text
//! /opt/modulefiles/        <- root
//!   gcc/                   <- module directory
//!     12.2                 <- Tcl modulefile, code "gcc/12.2"
//!     13.1.lua             <- Lmod modulefile, code "gcc/13.1"
//! ```
//!
//! Every PATH directory a modulefile names is scanned for executables, and
//! each one found becomes a [`BinaryEntry`](crate::index::BinaryEntry)
//! handed to an [`EntrySink`](crate::index::EntrySink).

pub mod crawler;
pub mod scanner;
pub mod warning;

pub use crawler::{module_code, sorted_entries, Crawler, ListDir, RootReport, VariableScope};
pub use scanner::{is_executable, scan_path, DirectoryScan};
pub use warning::{Warning, WarningKind};
