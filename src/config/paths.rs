//! Module root lists and the data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{LmcError, Result};

/// Split a colon-separated root list, dropping empty entries and repeats.
pub fn parse_module_roots(list: &str) -> Vec<PathBuf> {
    dedup_roots(list.split(':'))
}

/// Keep the first occurrence of each non-empty root, in order.
pub fn dedup_roots<'a>(parts: impl IntoIterator<Item = &'a str>) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let root = PathBuf::from(part);
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// Pick the data directory: `user`, then `~/.cache/lmc`, then a
/// per-process directory under the system temp dir.
///
/// Each candidate is created if missing and must be a readable directory.
/// A failed candidate is logged and the next one is tried.
///
/// # Errors
///
/// Returns `DataDir` if no candidate is usable.
pub fn resolve_data_dir(user: Option<&Path>) -> Result<PathBuf> {
    resolve_data_dir_from(user, dirs::home_dir())
}

/// [`resolve_data_dir`] with an explicit home directory.
pub fn resolve_data_dir_from(user: Option<&Path>, home: Option<PathBuf>) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    candidates.extend(user.map(Path::to_path_buf));
    candidates.extend(home.map(|h| h.join(".cache").join("lmc")));
    candidates.push(std::env::temp_dir().join(format!("lmc{:04x}", std::process::id() & 0xffff)));

    let mut failures = Vec::new();
    for candidate in candidates {
        match prepare_dir(&candidate) {
            Ok(()) => {
                tracing::debug!("Using data directory {}", candidate.display());
                return Ok(candidate);
            }
            Err(e) => {
                tracing::warn!("Can't use {} as data directory: {}", candidate.display(), e);
                failures.push(format!("{}: {}", candidate.display(), e));
            }
        }
    }

    Err(LmcError::DataDir {
        message: failures.join("; "),
    })
}

/// Create `path` (mode 0755) if missing and check that it can be listed.
pub fn prepare_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)?;

    if !fs::metadata(path)?.is_dir() {
        return Err(io::Error::new(io::ErrorKind::Other, "not a directory"));
    }
    fs::read_dir(path)?;
    Ok(())
}
