//! Compiles programs and evaluates them against input files.
//!
//! Evaluation of one input runs each rule in declaration order. For every
//! rule the pattern is resolved and rendered, compiled as a tree-sitter
//! query, and its matches are pulled one at a time; the action runs once per
//! match with fresh bindings. The first error aborts the input.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};
use tra_dsl::{Diagnostics, Program, parse_file};
use tra_syntax::{Cancellation, MatchCursor, Parser, Query, SupportedLanguage};

use crate::action::ActionContext;
use crate::bindings::Bindings;
use crate::cache::SymbolTableCache;
use crate::error::EvalError;
use crate::pattern::PreparedPattern;

/// A parsed, error-free program.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    program: Program,
}

impl CompiledProgram {
    /// Returns the program syntax tree.
    #[must_use]
    pub const fn ast(&self) -> &Program {
        &self.program
    }

    /// Returns the name the program was compiled under.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.program.file.name()
    }
}

/// Parses `src` into a program ready for evaluation.
///
/// Symbol names are not resolved here; that needs a target grammar and
/// happens per input.
///
/// # Errors
///
/// Returns every lexer and parser diagnostic when the program is malformed.
pub fn compile(filename: &str, src: &str) -> Result<CompiledProgram, Diagnostics> {
    let program = parse_file(filename, src)?;
    debug!(
        file = filename,
        rules = program.patterns.len(),
        "compiled program"
    );
    Ok(CompiledProgram { program })
}

/// Per-input evaluation settings.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Input name, used for language detection and log messages.
    pub filename: String,
    /// Explicit language; overrides detection from `filename`.
    pub language: Option<SupportedLanguage>,
    /// Stops match iteration early.
    pub cancellation: Cancellation,
}

impl EvalOptions {
    /// Options for an input called `filename`.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Forces `language` instead of detecting it.
    #[must_use]
    pub const fn with_language(mut self, language: Option<SupportedLanguage>) -> Self {
        self.language = language;
        self
    }

    /// Installs `cancellation`.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Counts from one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalSummary {
    /// Rules whose matches were fully processed.
    pub patterns: usize,
    /// Matches processed across all rules.
    pub matches: usize,
}

/// Evaluates compiled programs, caching grammar symbol tables across inputs.
#[derive(Debug, Default)]
pub struct Evaluator {
    symbols: SymbolTableCache,
}

impl Evaluator {
    /// Creates an evaluator with an empty symbol table cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol table cache.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTableCache {
        &self.symbols
    }

    /// Runs `program` over the raw bytes of `source`, writing action output
    /// to `out`.
    ///
    /// # Errors
    ///
    /// Fails when the language cannot be determined, a pattern cannot be
    /// resolved or compiled, an action fails, or iteration is cancelled.
    /// Output already written for earlier matches stays written.
    pub fn eval<W: Write>(
        &mut self,
        program: &CompiledProgram,
        source: &[u8],
        options: &EvalOptions,
        out: &mut W,
    ) -> Result<EvalSummary, EvalError> {
        let language =
            SupportedLanguage::resolve(Path::new(&options.filename), options.language)?;
        info!(file = %options.filename, %language, "evaluating input");

        let mut parser = Parser::new(language)?;
        let parsed = parser.parse(source)?;
        if parsed.has_errors() {
            let errors = parsed.errors();
            warn!(
                file = %options.filename,
                errors = errors.len(),
                first = %errors.first().map(ToString::to_string).unwrap_or_default(),
                "input has syntax errors; matching continues on the recovered tree"
            );
        }

        let symbols = self.symbols.get_or_build(language);
        let ast = program.ast();
        let mut summary = EvalSummary::default();
        for rule in &ast.patterns {
            let prepared = PreparedPattern::new(&rule.pattern, symbols, &ast.file)?;
            debug!(query = prepared.query(), "compiled query");
            let query = Query::compile(prepared.query(), language)?;

            let mut cursor = MatchCursor::new();
            let mut bindings = Bindings::new();
            let mut matched = 0_usize;
            for found in query.matches(&mut cursor, &parsed, &options.cancellation)? {
                bindings.bind_match(&found?, prepared.root_capture())?;
                ActionContext::new(&ast.file, &bindings, &mut *out).run(&rule.action)?;
                matched = matched.saturating_add(1);
            }
            debug!(query = prepared.query(), matches = matched, "rule finished");
            summary.patterns = summary.patterns.saturating_add(1);
            summary.matches = summary.matches.saturating_add(matched);
        }
        out.flush()?;
        Ok(summary)
    }
}
