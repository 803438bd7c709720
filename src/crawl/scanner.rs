//! Executable discovery in a single directory.

use std::fs;
use std::path::Path;

use super::{Warning, WarningKind};

/// Executables found in one PATH directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryScan {
    /// File names, sorted.
    pub binaries: Vec<String>,
    /// Entries that could not be stat'd.
    pub warnings: Vec<Warning>,
}

/// List the executables directly inside `dir`.
///
/// Subdirectories are not descended into. Symlinks are followed, so a link
/// to an executable counts and a dangling link is reported.
///
/// # Errors
///
/// Returns a `Candidate` warning when `dir` itself cannot be opened.
pub fn scan_path(dir: &Path) -> Result<DirectoryScan, Warning> {
    let entries =
        fs::read_dir(dir).map_err(|e| Warning::new(WarningKind::Candidate, dir, e.to_string()))?;

    let mut scan = DirectoryScan::default();
    for entry in entries.flatten() {
        let path = entry.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                if is_executable(&path) {
                    scan.binaries
                        .push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            Ok(_) => {}
            Err(e) => scan
                .warnings
                .push(Warning::new(WarningKind::Stat, &path, e.to_string())),
        }
    }
    scan.binaries.sort();
    Ok(scan)
}

/// Whether the current user may execute `path`.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

/// Whether the current user may execute `path`.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
