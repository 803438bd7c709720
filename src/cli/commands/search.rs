//! Search command implementation.
//!
//! Backs both `lmc search` (exact names) and `lmc like` (substrings).

use anyhow::Context;

use crate::error::Result;
use crate::index::IndexStore;
use crate::search::{MatchMode, SearchEngine};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The search command implementation.
pub struct SearchCommand {
    ctx: CommandContext,
    query: String,
    mode: MatchMode,
    json: bool,
}

impl SearchCommand {
    /// Create a new search command.
    pub fn new(ctx: CommandContext, query: &str, mode: MatchMode, json: bool) -> Self {
        Self {
            ctx,
            query: query.to_string(),
            mode,
            json,
        }
    }
}

impl Command for SearchCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store =
            IndexStore::open(&self.ctx.db_path)?.with_case_sensitive(self.ctx.config.case_sensitive);
        let results = SearchEngine::new(&store).search(&self.query, self.mode)?;

        if self.json {
            let json =
                serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
            ui.message(&json);
        } else {
            for entry in &results {
                ui.message(&format!("=> {}", entry));
            }
        }

        if results.is_empty() && !self.json {
            ui.warning(&format!("no binaries matching {:?}", self.query));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::crawl::VariableScope;
    use crate::index::{BinaryEntry, DB_FILE_NAME};
    use crate::ui::MockUI;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(temp: &Path, case_sensitive: bool) -> CommandContext {
        let db_path = temp.join(DB_FILE_NAME);
        let mut store = IndexStore::open(&db_path).unwrap();
        let mut rebuild = store.begin_rebuild().unwrap();
        for bin in ["gcc", "gcc-12", "MyGcc"] {
            rebuild
                .insert(&BinaryEntry::new("/mods", "gcc/12", bin))
                .unwrap();
        }
        rebuild.commit().unwrap();

        CommandContext {
            config: Config {
                module_roots: Vec::new(),
                data_dir: None,
                verbose: false,
                case_sensitive,
                variable_scope: VariableScope::File,
            },
            db_path,
        }
    }

    #[test]
    fn exact_search_prints_entry_lines() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        SearchCommand::new(context(temp.path(), false), "gcc", MatchMode::Exact, false)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(
            ui.messages(),
            &[r#"=> root="/mods", code="gcc/12", bin="gcc""#]
        );
    }

    #[test]
    fn like_search_ignores_case_by_default() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        SearchCommand::new(context(temp.path(), false), "gcc", MatchMode::Similar, false)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(ui.messages().len(), 3);
    }

    #[test]
    fn like_search_can_match_case() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        SearchCommand::new(context(temp.path(), true), "Gcc", MatchMode::Similar, false)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(ui.messages().len(), 1);
        assert!(ui.has_message("MyGcc"));
    }

    #[test]
    fn json_output_is_an_array() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        SearchCommand::new(context(temp.path(), false), "gcc", MatchMode::Exact, true)
            .execute(&mut ui)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["code"], "gcc/12");
    }

    #[test]
    fn no_results_warns_and_succeeds() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = SearchCommand::new(context(temp.path(), false), "clang", MatchMode::Exact, false)
            .execute(&mut ui)
            .unwrap();
        assert!(result.success);
        assert!(ui.messages().is_empty());
        assert!(ui.has_warning("clang"));
    }
}
