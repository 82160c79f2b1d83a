use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn argbatch(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("argbatch").expect("binary exists");
    cmd.current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("ARGBATCH_STRATEGY")
        .env_remove("ARGBATCH_MAX_COMMAND_BYTES")
        .env_remove("ARGBATCH_SEARCH_PATH")
        .env_remove("ARGBATCH_LOG")
        .env_remove("GOPATH");
    cmd
}

#[test]
fn help_displays_usage() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn packs_paths_under_the_byte_budget() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .args(["--max-bytes", "24", "one", "two", "three", "four", "--", "/usr/bin/foo", "-c"])
        .assert()
        .success()
        .stdout("/usr/bin/foo -c one two\n/usr/bin/foo -c three\n/usr/bin/foo -c four\n");
}

#[test]
fn no_paths_prints_nothing() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .args(["--", "gofmt", "-l"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn missing_command_fails() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .arg("pkg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing command"));
}

#[test]
fn files_by_package_emits_json() {
    let home = tempfile::tempdir().unwrap();
    let pkg = home.path().join("pkg");
    fs::create_dir(&pkg).unwrap();
    fs::write(pkg.join("b.go"), "package pkg").unwrap();
    fs::write(pkg.join("a.go"), "package pkg").unwrap();
    fs::write(pkg.join("a_test.go"), "package pkg").unwrap();

    argbatch(&home)
        .args([
            "--strategy",
            "files-by-package",
            "--exclude",
            "*_test.go",
            "--format",
            "json",
            "pkg",
            "empty",
            "--",
            "vet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pkg/a.go\""))
        .stdout(predicate::str::contains("\"pkg/b.go\""))
        .stdout(predicate::str::contains("a_test.go").not());
}

#[test]
fn packages_use_search_path_from_environment() {
    let home = tempfile::tempdir().unwrap();
    let root = home.path().join("gopath");
    let pkg = root.join("src").join("example.com").join("tool");

    argbatch(&home)
        .env("ARGBATCH_SEARCH_PATH", &root)
        .args(["--strategy", "packages"])
        .arg(pkg.to_str().unwrap())
        .args(["./local", "--", "golint"])
        .assert()
        .success()
        .stdout("golint example.com/tool ./local\n");
}

#[test]
fn workspace_config_sets_strategy() {
    let home = tempfile::tempdir().unwrap();
    fs::create_dir_all(home.path().join(".git")).unwrap();
    fs::create_dir_all(home.path().join(".argbatch")).unwrap();
    fs::write(
        home.path().join(".argbatch/config.toml"),
        "[partition]\nstrategy = \"single-directory\"\n",
    )
    .unwrap();

    argbatch(&home)
        .args(["a", "b", "--", "lint"])
        .assert()
        .success()
        .stdout("lint a\nlint b\n");
}

#[test]
fn unknown_strategy_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .args(["--strategy", "by-size", "a", "--", "lint"])
        .assert()
        .failure();
}

#[cfg(unix)]
fn non_utf8_gopath() -> std::ffi::OsString {
    use std::os::unix::ffi::OsStringExt;
    std::ffi::OsString::from_vec(b"/go\xff".to_vec())
}

#[cfg(unix)]
#[test]
fn unreadable_gopath_does_not_affect_directory_strategy() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .env("GOPATH", non_utf8_gopath())
        .args(["--strategy", "directories", "a", "b", "--", "lint"])
        .assert()
        .success()
        .stdout("lint a b\n");
}

#[cfg(unix)]
#[test]
fn explicit_search_path_wins_over_unreadable_gopath() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .env("GOPATH", non_utf8_gopath())
        .args(["--strategy", "packages", "--search-path", "/explicit"])
        .args(["/explicit/src/example.com/pkg", "--", "lint"])
        .assert()
        .success()
        .stdout("lint example.com/pkg\n");
}

#[cfg(unix)]
#[test]
fn unreadable_gopath_fails_package_resolution() {
    let home = tempfile::tempdir().unwrap();
    argbatch(&home)
        .env("GOPATH", non_utf8_gopath())
        .args(["--strategy", "packages", "/go/src/pkg", "--", "lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read search paths from $GOPATH"));
}
