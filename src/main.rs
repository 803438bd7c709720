//! lmc CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use lmc::cli::{Cli, CommandDispatcher};
use lmc::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO with `--verbose`, WARN otherwise
fn init_tracing(debug: bool, verbose: bool) {
    let filter = if debug {
        EnvFilter::new("lmc=debug")
    } else {
        let default = if verbose { "lmc=info" } else { "lmc=warn" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.verbose);

    tracing::debug!("lmc starting with args: {:?}", cli);

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let output_mode = OutputMode::from_flags(cli.quiet, cli.verbose);
    let mut ui = create_ui(true, output_mode);

    let dispatcher = CommandDispatcher::from_cli(&cli);
    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
