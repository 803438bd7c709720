//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which resolves
//! settings and the index location once and routes each subcommand to its
//! implementation.

pub mod build;
pub mod completions;
pub mod dispatcher;
pub mod search;
pub mod stats;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
