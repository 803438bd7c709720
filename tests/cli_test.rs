//! Integration tests for the lmc binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// A module root with `gcc/12` (Tcl) and `python/3.11` (Lmod).
fn setup_modules(temp: &Path) -> PathBuf {
    let gcc_bin = temp.join("apps/gcc-12/bin");
    let py_bin = temp.join("apps/python-3.11/bin");
    fs::create_dir_all(&gcc_bin).unwrap();
    fs::create_dir_all(&py_bin).unwrap();
    for (dir, name) in [
        (&gcc_bin, "gcc"),
        (&gcc_bin, "gcc-12"),
        (&py_bin, "python3"),
    ] {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        make_executable(&path);
    }

    let root = temp.join("modulefiles");
    fs::create_dir_all(root.join("gcc")).unwrap();
    fs::create_dir_all(root.join("python")).unwrap();
    fs::write(
        root.join("gcc/12"),
        format!(
            "#%Module1.0\nset root {}\nprepend-path PATH $root/bin\n",
            temp.join("apps/gcc-12").display()
        ),
    )
    .unwrap();
    fs::write(
        root.join("python/3.11.lua"),
        format!("prepend_path(\"PATH\", \"{}\")\n", py_bin.display()),
    )
    .unwrap();
    root
}

/// `lmc` with a private home, data dir, and module path.
fn lmc(temp: &Path, modulepath: impl AsRef<OsStr>) -> Command {
    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("MODULEPATH")
        .env_remove("LMC_MODULEPATH")
        .env_remove("RUST_LOG")
        .arg("-d")
        .arg(temp.join("data"))
        .arg("-m")
        .arg(modulepath);
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("like"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_without_command_shows_usage() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn cli_search_requires_name() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.arg("search");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_build_then_search() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());

    lmc(temp.path(), &root)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "cached 3 binaries from 2 module files",
        ));

    lmc(temp.path(), &root)
        .args(["search", "gcc"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "=> root=\"{}\", code=\"gcc/12\", bin=\"gcc\"",
            root.display()
        )))
        .stdout(predicate::str::contains("gcc-12").not());

    lmc(temp.path(), &root)
        .args(["search", "python3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code=\"python/3.11\""));
    Ok(())
}

#[test]
fn cli_like_matches_substrings() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    lmc(temp.path(), &root).arg("build").assert().success();

    lmc(temp.path(), &root)
        .args(["like", "GCC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bin=\"gcc\""))
        .stdout(predicate::str::contains("bin=\"gcc-12\""))
        .stdout(predicate::str::contains("python3").not());
    Ok(())
}

#[test]
fn cli_search_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    lmc(temp.path(), &root).arg("build").assert().success();

    let output = lmc(temp.path(), &root)
        .args(["search", "gcc", "--json"])
        .output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["code"], "gcc/12");
    Ok(())
}

#[test]
fn cli_search_before_build_finds_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());

    lmc(temp.path(), &root)
        .args(["search", "gcc"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn cli_build_skips_missing_roots() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    let list = format!("{}:{}", temp.path().join("absent").display(), root.display());

    lmc(temp.path(), &list)
        .args(["-v", "build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("couldn't open module root"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_build_tolerates_non_utf8_environment() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());

    lmc(temp.path(), &root)
        .env("LMC_TEST_BYTES", OsStr::from_bytes(b"/opt/\xff\xfe"))
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("cached 3 binaries"));
    Ok(())
}

#[test]
fn cli_warns_about_empty_module_path_only_when_building() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    lmc(temp.path(), "")
        .arg("build")
        .assert()
        .success()
        .stderr(predicate::function(|err: &str| {
            err.matches("no module paths").count() == 1
        }));

    lmc(temp.path(), "")
        .args(["search", "gcc"])
        .assert()
        .success()
        .stderr(predicate::str::contains("module paths").not());
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_build_survives_unreadable_module_directory() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    let locked = root.join("locked");
    fs::create_dir_all(&locked)?;
    fs::write(locked.join("1.0"), "#%Module\nprepend-path PATH /x\n")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
    // root ignores the mode bits, so the directory is only unreadable for others
    let unreadable = fs::read_dir(&locked).is_err();

    let output = lmc(temp.path(), &root).args(["-v", "build"]).output();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    let output = output?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cached 3 binaries"));
    if unreadable {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("couldn't open module dir"));
    }

    lmc(temp.path(), &root)
        .args(["search", "gcc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code=\"gcc/12\""));
    Ok(())
}

#[test]
fn cli_quiet_build_prints_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());

    lmc(temp.path(), &root)
        .args(["-q", "build"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn cli_stats_after_build() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    lmc(temp.path(), &root).arg("build").assert().success();

    lmc(temp.path(), &root)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("lmc.db"))
        .stdout(predicate::str::contains("Module files:"));
    Ok(())
}

#[test]
fn cli_reads_settings_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    let settings = temp.path().join("lmc.yml");
    fs::write(&settings, format!("modulepath: [{}]\n", root.display()))?;

    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.env("HOME", temp.path())
        .env_remove("MODULEPATH")
        .env_remove("LMC_MODULEPATH")
        .arg("-c")
        .arg(&settings)
        .arg("-d")
        .arg(temp.path().join("data"))
        .arg("build");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cached 3 binaries"));
    Ok(())
}

#[test]
fn cli_rejects_invalid_settings() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let root = setup_modules(temp.path());
    let settings = temp.path().join("lmc.yml");
    fs::write(&settings, "not_a_setting: 1\n")?;

    lmc(temp.path(), &root)
        .arg("-c")
        .arg(&settings)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn cli_generates_completions() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lmc"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("lmc"));
    Ok(())
}
