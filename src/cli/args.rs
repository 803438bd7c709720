//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::crawl::VariableScope;

/// lmc - find which module provides a binary.
#[derive(Debug, Parser)]
#[command(name = "lmc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Directory holding the index (default ~/.cache/lmc)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Colon-separated module roots (overrides MODULEPATH)
    #[arg(short, long, global = true, env = "LMC_MODULEPATH", value_name = "LIST")]
    pub modulepath: Option<String>,

    /// Path to settings file (default ~/.config/lmc/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flag values that take part in settings resolution.
    pub fn overrides(&self) -> ConfigOverrides {
        let (case_sensitive, variable_scope) = match &self.command {
            Commands::Build(args) => (false, args.scope),
            Commands::Like(args) => (args.case_sensitive, None),
            _ => (false, None),
        };
        ConfigOverrides {
            modulepath: self.modulepath.clone(),
            data_dir: self.data_dir.clone(),
            verbose: self.verbose,
            case_sensitive,
            variable_scope,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rebuild the index from the module roots
    Build(BuildArgs),

    /// Find modules providing a binary with exactly this name
    Search(SearchArgs),

    /// Find modules providing binaries whose name contains this text
    Like(LikeArgs),

    /// Show index size and the last build
    Stats(StatsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BuildArgs {
    /// Whether Tcl `set` variables carry over between module files
    #[arg(long, value_enum)]
    pub scope: Option<VariableScope>,
}

/// Arguments for the `search` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Binary name
    pub name: String,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `like` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LikeArgs {
    /// Text to look for in binary names
    pub name: String,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Match letter case exactly
    #[arg(short = 's', long)]
    pub case_sensitive: bool,
}

/// Arguments for the `stats` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search() {
        let cli = Cli::try_parse_from(["lmc", "search", "gcc"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.name, "gcc");
                assert!(!args.json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli =
            Cli::try_parse_from(["lmc", "build", "-d", "/tmp/data", "-m", "/a:/b", "-v"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(cli.modulepath.as_deref(), Some("/a:/b"));
        assert!(cli.verbose);
    }

    #[test]
    fn search_requires_a_name() {
        assert!(Cli::try_parse_from(["lmc", "search"]).is_err());
    }

    #[test]
    fn no_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["lmc"]).is_err());
    }

    #[test]
    fn build_scope_flag() {
        let cli = Cli::try_parse_from(["lmc", "build", "--scope", "build"]).unwrap();
        assert_eq!(cli.overrides().variable_scope, Some(VariableScope::Build));
    }

    #[test]
    fn like_case_flag_reaches_overrides() {
        let cli = Cli::try_parse_from(["lmc", "like", "-s", "Gcc"]).unwrap();
        assert!(cli.overrides().case_sensitive);
        let cli = Cli::try_parse_from(["lmc", "like", "gcc"]).unwrap();
        assert!(!cli.overrides().case_sensitive);
    }

    #[test]
    fn parses_completions_shell() {
        let cli = Cli::try_parse_from(["lmc", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions(CompletionsArgs { shell: Shell::Bash })
        ));
    }
}
