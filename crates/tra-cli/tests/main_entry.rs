//! Integration tests for the `tra` binary entry point.
//!
//! Exercises the real process: stream wiring, exit status and telemetry
//! errors that can only be observed once per process.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn prints_matches_from_stdin() {
    let mut command = cargo_bin_cmd!("tra");
    command
        .args(["-l", "typescript", "(identifier) @id {print(@id)}"])
        .write_stdin("const a = b;\n");
    command
        .assert()
        .success()
        .stdout("a\nb\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn dict_output_is_json() {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let input = dir.path().join("lib.rs");
    fs::write(&input, "fn answer() -> u32 { 42 }\n").unwrap_or_else(|err| panic!("write: {err}"));

    let mut command = cargo_bin_cmd!("tra");
    command
        .arg(r#"(func_item name: (identifier) @name) {print({@name: "fn", name: @name})}"#)
        .arg(&input);
    command
        .assert()
        .success()
        .stdout("{\"answer\":\"fn\",\"name\":\"answer\"}\n");
}

#[test]
fn syntax_errors_fail_the_process() {
    let mut command = cargo_bin_cmd!("tra");
    command.args(["-l", "py", "(identifier) {print(}"]);
    command
        .assert()
        .failure()
        .stderr(contains("tra: syntax error: <inline>:1:21:"));
}

#[test]
fn invalid_log_filter_is_rejected() {
    let mut command = cargo_bin_cmd!("tra");
    command
        .args(["--log-filter", "tra=loudest", "-l", "py", "(identifier) {}"])
        .write_stdin("x = 1\n");
    command
        .assert()
        .failure()
        .stderr(contains("tra: error: invalid log filter"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let mut command = cargo_bin_cmd!("tra");
    command
        .args(["-d", "--log-format", "json", "-l", "py", "(integer) {print(@)}"])
        .write_stdin("x = 7\n");
    command
        .assert()
        .success()
        .stdout("7\n")
        .stderr(contains("\"message\":\"compiled query\""));
}
