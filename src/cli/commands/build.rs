//! Build command implementation.
//!
//! The `lmc build` command recrawls every module root and replaces the
//! index in one transaction.

use crate::build::{build_index, BuildOptions, BuildReport};
use crate::error::Result;
use crate::expand::Expander;
use crate::index::IndexStore;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The build command implementation.
pub struct BuildCommand {
    ctx: CommandContext,
}

impl BuildCommand {
    /// Create a new build command.
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    fn report_warnings(&self, report: &BuildReport, ui: &mut dyn UserInterface) {
        if report.warnings.is_empty() {
            return;
        }
        if ui.output_mode().shows_details() {
            for warning in &report.warnings {
                ui.warning(&warning.to_string());
            }
        }

        let noun = if report.warnings.len() == 1 {
            "item"
        } else {
            "items"
        };
        let hint = if ui.output_mode().shows_details() {
            ""
        } else {
            " (use -v to list them)"
        };
        ui.warning(&format!(
            "skipped {} {}{}",
            report.warnings.len(),
            noun,
            hint
        ));
    }
}

impl Command for BuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = &self.ctx.config;
        if config.module_roots.is_empty() {
            ui.warning("no module paths, will not be able to find modules");
        }

        let mut store = IndexStore::open(&self.ctx.db_path)?;
        let options = BuildOptions {
            roots: config.module_roots.clone(),
            variable_scope: config.variable_scope,
        };

        let mut spinner = ui.start_spinner(&format!(
            "Crawling {} module roots",
            options.roots.len()
        ));
        let report = match build_index(&mut store, &options, Expander::from_env()) {
            Ok(report) => report,
            Err(e) => {
                spinner.finish_error("Build failed");
                return Err(e);
            }
        };
        spinner.finish_success(&format!(
            "cached {} binaries from {} module files in {:.2}s",
            report.entries,
            report.module_files,
            report.elapsed.as_secs_f64()
        ));

        self.report_warnings(&report, ui);
        Ok(CommandResult::success())
    }
}
