//! Unit tests for the CLI runtime, driven through injected streams.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::run;

/// Captured result of one `run` call.
struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Outcome {
    let argv = std::iter::once("tra")
        .chain(args.iter().copied())
        .map(OsString::from);
    let mut input = stdin.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run(argv, &mut input, &mut stdout, &mut stderr);
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).unwrap_or_else(|err| panic!("stdout utf8: {err}")),
        stderr: String::from_utf8(stderr).unwrap_or_else(|err| panic!("stderr utf8: {err}")),
    }
}

fn run_tra(args: &[&str]) -> Outcome {
    run_with_stdin(args, "")
}

#[fixture]
fn workdir() -> TempDir {
    TempDir::new().unwrap_or_else(|err| panic!("tempdir: {err}"))
}

fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap_or_else(|err| panic!("write {name}: {err}"));
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str()
        .unwrap_or_else(|| panic!("non-utf8 path {}", path.display()))
}

// =============================================================================
// Happy Path
// =============================================================================

#[rstest]
fn inline_program_runs_over_each_file(workdir: TempDir) {
    let first = write_file(workdir.path(), "a.py", "alpha = 1\n");
    let second = write_file(workdir.path(), "b.ts", "let beta = 2;\n");

    let outcome = run_tra(&[
        "(identifier) {print(@)}",
        path_arg(&first),
        path_arg(&second),
    ]);

    assert_eq!(outcome.stderr, "");
    assert_eq!(outcome.stdout, "alpha\nbeta\n");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
}

#[rstest]
fn program_file_makes_every_argument_an_input(workdir: TempDir) {
    let program = write_file(
        workdir.path(),
        "names.tra",
        "(func_def name: (id) @name) {\n  print(@name)\n}\n",
    );
    let input = write_file(workdir.path(), "mod.py", "def run():\n    pass\n");

    let outcome = run_tra(&["-f", path_arg(&program), path_arg(&input)]);

    assert_eq!(outcome.stdout, "run\n");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
}

#[test]
fn stdin_is_read_when_no_inputs_are_given() {
    let outcome = run_with_stdin(
        &["--language", "python", "(integer) {print(@)}"],
        "x = 41 + 1\n",
    );
    assert_eq!(outcome.stdout, "41\n1\n");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
}

#[rstest]
fn inputs_need_not_be_valid_utf8(workdir: TempDir) {
    let input = write_file(workdir.path(), "input.py", b"x = \"caf\xe9\"\n");
    let outcome = run_tra(&["(identifier) {print(@)}", path_arg(&input)]);

    assert_eq!(outcome.stderr, "");
    assert_eq!(outcome.stdout, "x\n");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
}

#[test]
fn version_is_printed_to_stdout() {
    let outcome = run_tra(&["--version"]);
    assert_eq!(
        outcome.stdout,
        format!("tra {}\n", env!("CARGO_PKG_VERSION"))
    );
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
}

// =============================================================================
// Unhappy Path
// =============================================================================

#[test]
fn syntax_errors_are_reported_one_per_line() {
    let outcome = run_tra(&["(a) {print({k: +})}\n(b) {print(}"]);
    assert_eq!(
        outcome.stderr,
        "tra: syntax error: <inline>:1:16: unexpected token PLUS(+), wanted expression\n\
         tra: syntax error: <inline>:2:12: expected RPAREN, got RCURLY_BRACKET(})\n"
    );
    assert_eq!(outcome.stdout, "");
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}

#[test]
fn stdin_without_language_is_an_error() {
    let outcome = run_with_stdin(&["(identifier) {print(@)}"], "x = 1\n");
    assert_eq!(
        outcome.stderr,
        "tra: error: could not determine language for <stdin>; pass --language explicitly\n"
    );
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}

#[rstest]
fn failing_input_does_not_stop_later_inputs(workdir: TempDir) {
    let missing = workdir.path().join("missing.py");
    let unknown = write_file(workdir.path(), "notes.txt", "hello\n");
    let good = write_file(workdir.path(), "ok.py", "value = 1\n");

    let outcome = run_tra(&[
        "(identifier) {print(@)}",
        path_arg(&missing),
        path_arg(&unknown),
        path_arg(&good),
    ]);

    let lines: Vec<&str> = outcome.stderr.lines().collect();
    assert_eq!(lines.len(), 2, "{}", outcome.stderr);
    assert!(
        lines
            .first()
            .is_some_and(|line| line.starts_with("tra: error: failed to read ")),
        "{lines:?}"
    );
    assert_eq!(
        lines.get(1).copied(),
        Some(
            format!(
                "tra: error: could not determine language for {}; pass --language explicitly",
                unknown.display()
            )
            .as_str()
        )
    );
    assert_eq!(outcome.stdout, "value\n");
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}

#[rstest]
fn evaluation_error_is_prefixed(workdir: TempDir) {
    let input = write_file(workdir.path(), "a.rs", "fn main() {}\n");
    let outcome = run_tra(&["(identifier) {print(@nope)}", path_arg(&input)]);
    assert_eq!(
        outcome.stderr,
        "tra: error: <inline>:1:21: unknown variable @nope\n"
    );
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}

#[rstest]
#[case(&[], "tra: error: no program given; pass PROGRAM or -f PROGFILE\n")]
#[case(
    &["--log-filter", " ", "(identifier) {}"],
    "tra: error: invalid configuration: log filter must not be empty\n"
)]
fn setup_errors_are_reported(#[case] args: &[&str], #[case] expected: &str) {
    let outcome = run_tra(args);
    assert_eq!(outcome.stderr, expected);
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}

#[rstest]
fn unreadable_program_file_is_reported(workdir: TempDir) {
    let program = workdir.path().join("absent.tra");
    let outcome = run_tra(&["-f", path_arg(&program)]);
    assert!(
        outcome
            .stderr
            .starts_with(&format!("tra: error: failed to read program {}: ", program.display())),
        "{}",
        outcome.stderr
    );
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let outcome = run_tra(&["--frobnicate"]);
    assert!(outcome.stderr.contains("--frobnicate"), "{}", outcome.stderr);
    assert_eq!(outcome.stdout, "");
    assert_eq!(outcome.exit, ExitCode::FAILURE);
}
