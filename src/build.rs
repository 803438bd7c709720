//! Rebuilding the index from module roots.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::crawl::{Crawler, VariableScope, Warning};
use crate::error::Result;
use crate::expand::Expander;
use crate::index::{BuildInfo, IndexStore};
use crate::modulefile::ModuleFileParser;

/// What to crawl and how.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Module roots, crawled in order.
    pub roots: Vec<PathBuf>,
    pub variable_scope: VariableScope,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub roots: usize,
    pub module_files: usize,
    pub entries: usize,
    /// Entries removed from the previous index.
    pub cleared: usize,
    pub warnings: Vec<Warning>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Replace the contents of `store` with a fresh crawl of `options.roots`.
///
/// `expander` seeds variable lookups; pass [`Expander::from_env`] to see the
/// process environment. The previous index stays visible to readers until
/// the new one commits.
///
/// # Errors
///
/// Fails only if the grammar does not compile or the rebuild transaction
/// cannot begin, clear, or commit. Everything else is a warning.
pub fn build_index(
    store: &mut IndexStore,
    options: &BuildOptions,
    expander: Expander,
) -> Result<BuildReport> {
    let parser = ModuleFileParser::new()?;
    let start = Instant::now();

    let mut rebuild = store.begin_rebuild()?;
    let cleared = rebuild.clear()?;
    debug!("Flushed {} entries from the index", cleared);

    let mut crawler = Crawler::new(&parser, expander, options.variable_scope);
    let mut report = BuildReport {
        roots: options.roots.len(),
        module_files: 0,
        entries: 0,
        cleared,
        warnings: Vec::new(),
        elapsed: Duration::ZERO,
    };

    for root in &options.roots {
        let root_report = crawler.crawl_root(root, &mut rebuild);
        debug!(
            "{}: {} module files, {} entries, {} warnings",
            root.display(),
            root_report.module_files,
            root_report.entries,
            root_report.warnings.len()
        );
        report.module_files += root_report.module_files;
        report.entries += root_report.entries;
        report.warnings.extend(root_report.warnings);
    }

    rebuild.record_build(&BuildInfo {
        built_at: Utc::now(),
        roots: report.roots,
        module_files: report.module_files,
        entries: report.entries,
        warnings: report.warnings.len(),
    })?;
    rebuild.commit()?;

    report.elapsed = start.elapsed();
    info!(
        "Cached {} binaries from {} module files in {:.2}s",
        report.entries,
        report.module_files,
        report.elapsed.as_secs_f64()
    );
    Ok(report)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::expand::VariableStore;
    use crate::index::BinaryEntry;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn tree(temp: &Path) -> PathBuf {
        let bin = temp.join("apps/gcc/bin");
        fs::create_dir_all(&bin).unwrap();
        for name in ["gcc", "g++"] {
            let path = bin.join(name);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let root = temp.join("mods");
        fs::create_dir_all(root.join("gcc")).unwrap();
        fs::write(
            root.join("gcc/12"),
            format!("#%Module\nprepend-path PATH {}\n", bin.display()),
        )
        .unwrap();
        root
    }

    fn options(roots: Vec<PathBuf>) -> BuildOptions {
        BuildOptions {
            roots,
            variable_scope: VariableScope::File,
        }
    }

    fn isolated() -> Expander {
        Expander::new(VariableStore::isolated())
    }

    #[test]
    fn build_populates_index() {
        let temp = TempDir::new().unwrap();
        let root = tree(temp.path());
        let mut store = IndexStore::open_in_memory().unwrap();

        let report = build_index(&mut store, &options(vec![root.clone()]), isolated()).unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(report.module_files, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(
            store.search_exact("gcc").unwrap(),
            vec![BinaryEntry::new(root.display().to_string(), "gcc/12", "gcc")]
        );

        let info = store.build_info().unwrap().unwrap();
        assert_eq!(info.entries, 2);
        assert_eq!(info.roots, 1);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = tree(temp.path());
        let mut store = IndexStore::open_in_memory().unwrap();

        build_index(&mut store, &options(vec![root.clone()]), isolated()).unwrap();
        let first = store.search_similar("").unwrap();
        let report = build_index(&mut store, &options(vec![root]), isolated()).unwrap();
        assert_eq!(report.cleared, 2);
        assert_eq!(store.search_similar("").unwrap(), first);
    }

    #[test]
    fn missing_roots_still_commit() {
        let temp = TempDir::new().unwrap();
        let root = tree(temp.path());
        let mut store = IndexStore::open_in_memory().unwrap();

        let report = build_index(
            &mut store,
            &options(vec![temp.path().join("absent"), root]),
            isolated(),
        )
        .unwrap();
        assert_eq!(report.entries, 2);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn empty_roots_empty_the_index() {
        let temp = TempDir::new().unwrap();
        let root = tree(temp.path());
        let mut store = IndexStore::open_in_memory().unwrap();

        build_index(&mut store, &options(vec![root]), isolated()).unwrap();
        build_index(&mut store, &options(Vec::new()), isolated()).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
