//! Command-line argument definitions for `tra`.

use std::path::PathBuf;

use clap::Parser;
use tra_config::Config;
use tra_syntax::SupportedLanguage;

/// Program name used for diagnostics when the program is given inline.
pub(crate) const INLINE_PROGRAM_NAME: &str = "<inline>";

/// Runs a pattern/action program over source files.
///
/// Without `-f`, the first positional argument is the program text and the
/// rest are input files. With `-f`, every positional argument is an input
/// file. When no input files are given the input is read from stdin, which
/// requires `--language`.
#[derive(Parser, Debug)]
#[command(name = "tra", version, about)]
pub(crate) struct Cli {
    /// Reads the program from PROGFILE instead of the first argument.
    #[arg(short = 'f', long = "program-file", value_name = "PROGFILE")]
    pub(crate) program_file: Option<PathBuf>,

    /// Language of every input, overriding detection by file extension.
    #[arg(short = 'l', long, value_name = "LANGUAGE")]
    pub(crate) language: Option<SupportedLanguage>,

    /// Enables debug logging on stderr.
    #[arg(short = 'd', long)]
    pub(crate) verbose: bool,

    #[command(flatten)]
    pub(crate) config: Config,

    /// The program text (unless `-f` is given) followed by input files.
    #[arg(value_name = "PROGRAM|FILE")]
    pub(crate) arguments: Vec<String>,
}

impl Cli {
    /// Splits positional arguments into the inline program, if any, and the
    /// input files.
    pub(crate) fn split_arguments(&self) -> (Option<&str>, &[String]) {
        if self.program_file.is_some() {
            return (None, &self.arguments);
        }
        match self.arguments.split_first() {
            Some((program, inputs)) => (Some(program.as_str()), inputs),
            None => (None, &[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tra").chain(args.iter().copied()))
            .unwrap_or_else(|err| panic!("parse {args:?}: {err}"))
    }

    #[rstest]
    #[case(&["(identifier) {print(@)}", "a.py", "b.py"], Some("(identifier) {print(@)}"), &["a.py", "b.py"])]
    #[case(&["(identifier) {print(@)}"], Some("(identifier) {print(@)}"), &[])]
    #[case(&["-f", "prog.tra", "a.py", "b.py"], None, &["a.py", "b.py"])]
    #[case(&["-f", "prog.tra"], None, &[])]
    #[case(&[], None, &[])]
    fn positional_arguments_split_by_program_source(
        #[case] args: &[&str],
        #[case] program: Option<&str>,
        #[case] inputs: &[&str],
    ) {
        let cli = parse(args);
        let (found_program, found_inputs) = cli.split_arguments();
        assert_eq!(found_program, program);
        assert_eq!(found_inputs, inputs);
    }

    #[test]
    fn short_flags_are_recognised() {
        let cli = parse(&["-d", "-l", "py", "--log-format", "json", "(x) {print(@)}"]);
        assert!(cli.verbose);
        assert_eq!(cli.language, Some(SupportedLanguage::Python));
        assert_eq!(cli.config.log_format(), tra_config::LogFormat::Json);
    }

    #[test]
    fn unknown_language_is_a_usage_error() {
        let result = Cli::try_parse_from(["tra", "--language", "cobol", "(x) {}"]);
        assert!(result.is_err());
    }
}
