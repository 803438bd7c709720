//! Module root traversal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::expand::Expander;
use crate::index::{BinaryEntry, EntrySink};
use crate::modulefile::ModuleFileParser;

use super::scanner::scan_path;
use super::{Warning, WarningKind};

/// How long a Tcl `set` stays visible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VariableScope {
    /// Variables are forgotten after each modulefile.
    #[default]
    File,
    /// Variables carry over to every later modulefile in the build.
    Build,
}

/// Lists a directory as `(name, path)` pairs sorted by name.
pub type ListDir = fn(&Path) -> io::Result<Vec<(String, PathBuf)>>;

/// Counts and warnings from crawling one root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootReport {
    pub root: PathBuf,
    /// Modulefiles read and parsed.
    pub module_files: usize,
    /// Entries accepted by the sink.
    pub entries: usize,
    pub warnings: Vec<Warning>,
}

/// Walks module roots and feeds discovered binaries to a sink.
pub struct Crawler<'p> {
    parser: &'p ModuleFileParser,
    expander: Expander,
    scope: VariableScope,
    list_dir: ListDir,
}

impl<'p> Crawler<'p> {
    /// Create a crawler. `expander` supplies the starting variables for
    /// every modulefile.
    pub fn new(parser: &'p ModuleFileParser, expander: Expander, scope: VariableScope) -> Self {
        Self {
            parser,
            expander,
            scope,
            list_dir: sorted_entries,
        }
    }

    /// List module roots and module directories with `list_dir` instead of
    /// [`sorted_entries`].
    pub fn with_list_dir(mut self, list_dir: ListDir) -> Self {
        self.list_dir = list_dir;
        self
    }

    /// Crawl one root. Problems are recorded in the report and never stop
    /// the walk.
    pub fn crawl_root(&mut self, root: &Path, sink: &mut dyn EntrySink) -> RootReport {
        let mut report = RootReport {
            root: root.to_path_buf(),
            ..Default::default()
        };
        let root_name = root.to_string_lossy().into_owned();

        let modules = match (self.list_dir)(root) {
            Ok(entries) => entries,
            Err(e) => {
                report
                    .warnings
                    .push(Warning::new(WarningKind::Root, root, e.to_string()));
                return report;
            }
        };

        debug!("Crawling {} ({} entries)", root.display(), modules.len());
        for (name, path) in modules {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    self.crawl_module_dir(&root_name, &name, &path, sink, &mut report)
                }
                Ok(_) => {}
                Err(e) => report
                    .warnings
                    .push(Warning::new(WarningKind::Stat, &path, e.to_string())),
            }
        }
        report
    }

    fn crawl_module_dir(
        &mut self,
        root_name: &str,
        module: &str,
        dir: &Path,
        sink: &mut dyn EntrySink,
        report: &mut RootReport,
    ) {
        let files = match (self.list_dir)(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.warnings.push(Warning::new(
                    WarningKind::ModuleDirectory,
                    dir,
                    e.to_string(),
                ));
                return;
            }
        };

        for (file_name, path) in files {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {
                    let code = module_code(module, &file_name);
                    self.crawl_module_file(root_name, &code, &path, sink, report);
                }
                Ok(_) => {}
                Err(e) => report
                    .warnings
                    .push(Warning::new(WarningKind::Stat, &path, e.to_string())),
            }
        }
    }

    fn crawl_module_file(
        &mut self,
        root_name: &str,
        code: &str,
        path: &Path,
        sink: &mut dyn EntrySink,
        report: &mut RootReport,
    ) {
        debug!("Building {} from {}", code, path.display());

        let mut per_file;
        let expander = match self.scope {
            VariableScope::File => {
                per_file = self.expander.clone();
                &mut per_file
            }
            VariableScope::Build => &mut self.expander,
        };

        let parsed = match self.parser.parse_file(path, expander) {
            Ok(parsed) => parsed,
            Err(warning) => {
                report.warnings.push(warning);
                return;
            }
        };
        report.module_files += 1;
        report.warnings.extend(parsed.warnings);

        for candidate in &parsed.candidates {
            for dir in candidate.value.split(':').filter(|d| !d.is_empty()) {
                let dir = Path::new(dir);
                let scan = match scan_path(dir) {
                    Ok(scan) => scan,
                    Err(warning) => {
                        report.warnings.push(warning);
                        continue;
                    }
                };
                report.warnings.extend(scan.warnings);

                for bin in scan.binaries {
                    let bin_path = dir.join(&bin);
                    match sink.accept(BinaryEntry::new(root_name, code, bin)) {
                        Ok(()) => report.entries += 1,
                        Err(e) => report.warnings.push(Warning::new(
                            WarningKind::Insert,
                            bin_path,
                            e.to_string(),
                        )),
                    }
                }
            }
        }
    }
}

/// The module code for a modulefile: `<module>/<file>`, minus any `.lua`.
pub fn module_code(module: &str, file_name: &str) -> String {
    let stem = file_name.strip_suffix(".lua").unwrap_or(file_name);
    format!("{}/{}", module, stem)
}

/// Directory entries as `(name, path)`, sorted by name.
pub fn sorted_entries(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut entries: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .flatten()
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .collect();
    entries.sort();
    Ok(entries)
}
