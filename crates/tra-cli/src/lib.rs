//! Runtime for the `tra` command-line tool.
//!
//! [`run`] parses arguments, installs telemetry, compiles the program and
//! evaluates it over every input in order. All streams are injected so tests
//! can drive the tool without spawning a process.
//!
//! Problems are reported on stderr, one per line:
//!
//! - `tra: syntax error: <file>:<line>:<col>: <message>` for each program
//!   diagnostic; nothing is evaluated.
//! - `tra: error: <message>` for a failing input; the remaining inputs are
//!   still processed.
//!
//! The exit status is a failure when anything was reported.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::debug;

use tra_config::ConfigError;
use tra_eval::{CompiledProgram, EvalOptions, Evaluator, compile};
use tra_syntax::SupportedLanguage;

mod cli;
pub mod telemetry;

use cli::{Cli, INLINE_PROGRAM_NAME};
use telemetry::TelemetryError;

/// Input name used when reading from stdin.
pub const STDIN_NAME: &str = "<stdin>";

const ERROR_PREFIX: &str = "tra: error:";
const SYNTAX_ERROR_PREFIX: &str = "tra: syntax error:";

#[derive(Debug, Error)]
enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("no program given; pass PROGRAM or -f PROGFILE")]
    MissingProgram,
    #[error("failed to read program {path}: {source}")]
    ReadProgram { path: String, source: io::Error },
    #[error("failed to read {path}: {source}")]
    ReadInput { path: String, source: io::Error },
    #[error("failed to write diagnostics: {0}")]
    Report(#[from] io::Error),
}

/// Bundles the streams handed to the runtime.
struct IoStreams<'a, R: Read, W: Write, E: Write> {
    stdin: &'a mut R,
    stdout: &'a mut W,
    stderr: &'a mut E,
}

/// Evaluates one compiled program over a sequence of inputs.
struct Session<'p> {
    program: &'p CompiledProgram,
    language: Option<SupportedLanguage>,
    evaluator: Evaluator,
    failed: bool,
}

impl<'p> Session<'p> {
    fn new(program: &'p CompiledProgram, language: Option<SupportedLanguage>) -> Self {
        Self {
            program,
            language,
            evaluator: Evaluator::new(),
            failed: false,
        }
    }

    fn evaluate<W: Write, E: Write>(
        &mut self,
        name: &str,
        source: &[u8],
        stdout: &mut W,
        stderr: &mut E,
    ) -> Result<(), AppError> {
        let options = EvalOptions::new(name).with_language(self.language);
        match self.evaluator.eval(self.program, source, &options, stdout) {
            Ok(summary) => {
                debug!(
                    file = name,
                    patterns = summary.patterns,
                    matches = summary.matches,
                    "input finished"
                );
                Ok(())
            }
            Err(error) => self.report(stderr, &error),
        }
    }

    fn report<E: Write>(
        &mut self,
        stderr: &mut E,
        error: &dyn std::error::Error,
    ) -> Result<(), AppError> {
        self.failed = true;
        writeln!(stderr, "{ERROR_PREFIX} {error}")?;
        Ok(())
    }
}

/// Runs `tra` with the given arguments and streams.
///
/// The first element of `args` is the binary name, as with
/// [`std::env::args_os`].
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    let mut io = IoStreams {
        stdin,
        stdout,
        stderr,
    };
    match execute(&cli, &mut io) {
        Ok(exit_code) => exit_code,
        Err(error) => {
            let _ = writeln!(io.stderr, "{ERROR_PREFIX} {error}");
            ExitCode::FAILURE
        }
    }
}

fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    if error.use_stderr() {
        let _ = write!(stderr, "{rendered}");
        ExitCode::FAILURE
    } else {
        let _ = write!(stdout, "{rendered}");
        ExitCode::SUCCESS
    }
}

fn execute<R, W, E>(cli: &Cli, io: &mut IoStreams<'_, R, W, E>) -> Result<ExitCode, AppError>
where
    R: Read,
    W: Write,
    E: Write,
{
    let config = cli.config.clone().with_verbose(cli.verbose);
    config.validate()?;
    telemetry::initialise(&config)?;

    let (name, text) = load_program(cli)?;
    let program = match compile(&name, &text) {
        Ok(program) => program,
        Err(diagnostics) => {
            for diagnostic in diagnostics.iter() {
                writeln!(io.stderr, "{SYNTAX_ERROR_PREFIX} {diagnostic}")?;
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let (_, inputs) = cli.split_arguments();
    let mut session = Session::new(&program, cli.language);
    if inputs.is_empty() {
        let mut source = Vec::new();
        match io.stdin.read_to_end(&mut source) {
            Ok(_) => session.evaluate(STDIN_NAME, &source, &mut *io.stdout, &mut *io.stderr)?,
            Err(source_error) => {
                let error = AppError::ReadInput {
                    path: STDIN_NAME.to_owned(),
                    source: source_error,
                };
                session.report(&mut *io.stderr, &error)?;
            }
        }
    }
    for path in inputs {
        match fs::read(path) {
            Ok(source) => session.evaluate(path, &source, &mut *io.stdout, &mut *io.stderr)?,
            Err(source_error) => {
                let error = AppError::ReadInput {
                    path: path.clone(),
                    source: source_error,
                };
                session.report(&mut *io.stderr, &error)?;
            }
        }
    }

    Ok(if session.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Returns the program's diagnostic name and text.
fn load_program(cli: &Cli) -> Result<(String, String), AppError> {
    if let Some(path) = &cli.program_file {
        let name = path.display().to_string();
        return match fs::read_to_string(path) {
            Ok(text) => Ok((name, text)),
            Err(source) => Err(AppError::ReadProgram { path: name, source }),
        };
    }
    match cli.split_arguments() {
        (Some(text), _) => Ok((INLINE_PROGRAM_NAME.to_owned(), text.to_owned())),
        (None, _) => Err(AppError::MissingProgram),
    }
}

#[cfg(test)]
mod tests;
