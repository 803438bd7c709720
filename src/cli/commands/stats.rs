//! Stats command implementation.
//!
//! The `lmc stats` command shows where the index lives, how many entries it
//! holds, and what the last build found.

use anyhow::Context;
use serde::Serialize;

use crate::cli::args::StatsArgs;
use crate::error::Result;
use crate::index::{BuildInfo, IndexStore};
use crate::ui::{LmcTheme, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

#[derive(Serialize)]
struct Stats<'a> {
    database: String,
    entries: usize,
    last_build: Option<&'a BuildInfo>,
}

/// The stats command implementation.
pub struct StatsCommand {
    ctx: CommandContext,
    args: StatsArgs,
}

impl StatsCommand {
    /// Create a new stats command.
    pub fn new(ctx: CommandContext, args: StatsArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for StatsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = IndexStore::open(&self.ctx.db_path)?;
        let entries = store.count()?;
        let info = store.build_info()?;
        let database = self.ctx.db_path.display().to_string();

        if self.args.json {
            let stats = Stats {
                database,
                entries,
                last_build: info.as_ref(),
            };
            let json = serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let theme = LmcTheme::plain();
        ui.show_header("Index");
        ui.message(&theme.format_field("Database", &database, 12));
        ui.message(&theme.format_field("Entries", &entries.to_string(), 12));

        match info {
            Some(info) => {
                ui.message(&theme.format_field(
                    "Built",
                    &info.built_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    12,
                ));
                ui.message(&theme.format_field("Roots", &info.roots.to_string(), 12));
                ui.message(&theme.format_field(
                    "Module files",
                    &info.module_files.to_string(),
                    12,
                ));
                ui.message(&theme.format_field("Warnings", &info.warnings.to_string(), 12));
            }
            None => ui.message("  No build recorded yet. Run `lmc build` first."),
        }
        Ok(CommandResult::success())
    }
}
