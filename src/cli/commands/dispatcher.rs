//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::config::{resolve_data_dir, Config, ConfigOverrides};
use crate::error::Result;
use crate::index::DB_FILE_NAME;
use crate::search::MatchMode;
use crate::ui::{OutputMode, UserInterface};

use super::build::BuildCommand;
use super::completions::CompletionsCommand;
use super::search::SearchCommand;
use super::stats::StatsCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Settings every index command needs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub db_path: PathBuf,
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    overrides: ConfigOverrides,
    settings_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher from command-line values.
    pub fn new(overrides: ConfigOverrides, settings_path: Option<PathBuf>) -> Self {
        Self {
            overrides,
            settings_path,
        }
    }

    /// Create a dispatcher for parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(cli.overrides(), cli.config.clone())
    }

    /// Load settings and locate the index.
    ///
    /// # Errors
    ///
    /// Fails if the settings file is invalid or no data directory is usable.
    pub fn context(&self) -> Result<CommandContext> {
        let config = Config::load(&self.overrides, self.settings_path.as_deref())?;
        let data_dir = resolve_data_dir(config.data_dir.as_deref())?;
        Ok(CommandContext {
            config,
            db_path: data_dir.join(DB_FILE_NAME),
        })
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Commands::Completions(args) = &cli.command {
            return CompletionsCommand::new(args.clone()).execute(ui);
        }

        let ctx = self.context()?;
        if ctx.config.verbose && ui.output_mode() == OutputMode::Normal {
            ui.set_output_mode(OutputMode::Verbose);
        }
        tracing::debug!("Using index at {}", ctx.db_path.display());

        match &cli.command {
            Commands::Build(_) => BuildCommand::new(ctx).execute(ui),
            Commands::Search(args) => {
                SearchCommand::new(ctx, &args.name, MatchMode::Exact, args.json).execute(ui)
            }
            Commands::Like(args) => {
                SearchCommand::new(ctx, &args.name, MatchMode::Similar, args.json).execute(ui)
            }
            Commands::Stats(args) => StatsCommand::new(ctx, args.clone()).execute(ui),
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}
