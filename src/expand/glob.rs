//! Filename pattern expansion.
//!
//! Patterns are matched one path component at a time against directory
//! listings. A pattern that matches nothing is kept as written (after quote
//! removal), the way a POSIX shell leaves an unmatched glob alone.

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;

use super::words::Word;
use super::ExpansionError;

/// Expand one word into the fields it produces.
pub fn expand_word(word: &Word) -> Result<Vec<String>, ExpansionError> {
    if !word.has_glob() {
        return Ok(vec![word.literal()]);
    }

    let matches = glob_paths(&word.pattern())?;
    if matches.is_empty() {
        Ok(vec![word.literal()])
    } else {
        Ok(matches)
    }
}

/// Whether a pattern component contains an unescaped metacharacter.
fn has_meta(component: &str) -> bool {
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' | '[' => return true,
            _ => {}
        }
    }
    false
}

fn unescape(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Return every existing path matching `pattern`, sorted per component.
pub fn glob_paths(pattern: &str) -> Result<Vec<String>, ExpansionError> {
    let dirs_only = pattern.ends_with('/');
    let mut paths = vec![if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    }];

    for component in pattern.split('/').filter(|c| !c.is_empty()) {
        if !has_meta(component) {
            let literal = unescape(component);
            for path in &mut paths {
                path.push(&literal);
            }
            continue;
        }

        let matcher = GlobBuilder::new(component)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| ExpansionError::Pattern {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            })?
            .compile_matcher();
        let show_hidden = component.starts_with('.');

        let mut next = Vec::new();
        for base in &paths {
            let dir = if base.as_os_str().is_empty() {
                Path::new(".")
            } else {
                base.as_path()
            };
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };

            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| show_hidden || !name.starts_with('.'))
                .filter(|name| matcher.is_match(name))
                .collect();
            names.sort();

            next.extend(names.into_iter().map(|name| base.join(name)));
        }

        paths = next;
        if paths.is_empty() {
            break;
        }
    }

    Ok(paths
        .into_iter()
        .filter(|p| {
            if dirs_only {
                p.is_dir()
            } else {
                fs::symlink_metadata(p).is_ok()
            }
        })
        .map(|p| {
            let mut s = p.to_string_lossy().into_owned();
            if dirs_only {
                s.push('/');
            }
            s
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn has_meta_ignores_escaped_chars() {
        assert!(has_meta("a*"));
        assert!(has_meta("[ab]"));
        assert!(!has_meta("a\\*"));
        assert!(!has_meta("plain"));
    }

    #[test]
    fn matches_files_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("b.txt"));
        touch(&temp.path().join("a.txt"));
        touch(&temp.path().join("c.log"));

        let pattern = format!("{}/*.txt", temp.path().display());
        let found = glob_paths(&pattern).unwrap();
        assert_eq!(
            found,
            vec![
                format!("{}/a.txt", temp.path().display()),
                format!("{}/b.txt", temp.path().display()),
            ]
        );
    }

    #[test]
    fn matches_through_directory_components() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("gcc-12/bin")).unwrap();
        fs::create_dir_all(temp.path().join("gcc-13/bin")).unwrap();
        fs::create_dir_all(temp.path().join("gcc-14")).unwrap();

        let pattern = format!("{}/gcc-*/bin", temp.path().display());
        let found = glob_paths(&pattern).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("gcc-12/bin"));
        assert!(found[1].ends_with("gcc-13/bin"));
    }

    #[test]
    fn hidden_entries_need_explicit_dot() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join(".hidden"));
        touch(&temp.path().join("shown"));

        let all = glob_paths(&format!("{}/*", temp.path().display())).unwrap();
        assert_eq!(all.len(), 1);

        let dotted = glob_paths(&format!("{}/.h*", temp.path().display())).unwrap();
        assert_eq!(dotted.len(), 1);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let result = glob_paths("/tmp/[abc");
        assert!(matches!(result, Err(ExpansionError::Pattern { .. })));
    }

    #[test]
    fn unmatched_pattern_keeps_literal() {
        let word = super::super::words::split_words(
            "/definitely/not/here/*",
            &super::super::VariableStore::isolated(),
        )
        .unwrap()
        .remove(0);
        assert_eq!(expand_word(&word).unwrap(), vec!["/definitely/not/here/*"]);
    }
}
