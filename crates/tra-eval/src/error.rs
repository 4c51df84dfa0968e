//! Errors raised while evaluating a program against an input.

use std::io;

use thiserror::Error;
use tra_dsl::Position;
use tra_syntax::SyntaxError;

/// Failure that aborts evaluation of the current input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// The tree-sitter layer failed: unknown language, parser setup, query
    /// compilation or cancellation.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A pattern names a node type that matches no grammar symbol.
    #[error("{position}: unknown symbol {symbol}")]
    UnknownSymbol {
        /// The symbol as written.
        symbol: String,
        /// Where the symbol appears in the program.
        position: Position,
    },

    /// An abbreviation matches several grammar symbols equally well.
    #[error(
        "{position}: ambiguous symbol abbreviation {symbol} (candidates: {})",
        candidates.join(", ")
    )]
    AmbiguousSymbol {
        /// The abbreviation as written.
        symbol: String,
        /// Every grammar symbol tying for the best match.
        candidates: Vec<String>,
        /// Where the abbreviation appears in the program.
        position: Position,
    },

    /// The same capture name is used twice within one pattern.
    #[error("{position}: capture {name} is already used in this pattern")]
    DuplicateCapture {
        /// The repeated capture, including its `@`.
        name: String,
        /// Position of the second occurrence.
        position: Position,
    },

    /// A pattern captures into the name reserved for the implicit root.
    #[error("{position}: capture {name} is reserved")]
    ReservedCapture {
        /// The capture, including its `@`.
        name: String,
        /// Where the capture appears in the program.
        position: Position,
    },

    /// An identifier is not bound in the current match.
    #[error("{position}: unknown variable {name}")]
    UnknownVariable {
        /// The identifier as written.
        name: String,
        /// Where the identifier appears in the program.
        position: Position,
    },

    /// A built-in was called with the wrong number of arguments.
    #[error("{position}: {function} expects {expected} argument, got {actual}")]
    Arity {
        /// The called built-in.
        function: String,
        /// Number of arguments the built-in takes.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
        /// Position of the call.
        position: Position,
    },

    /// An action calls a function that is not a built-in.
    #[error("{position}: unknown function {name}")]
    UnknownFunction {
        /// The called name.
        name: String,
        /// Position of the call.
        position: Position,
    },

    /// A dict key evaluated to a value that cannot be a key.
    #[error("{position}: unsupported dict key of type {kind}")]
    UnsupportedKey {
        /// Type name of the rejected key.
        kind: &'static str,
        /// Position of the key expression.
        position: Position,
    },

    /// A match arrived without its root capture. Indicates a bug.
    #[error("internal error: root capture @{capture} missing from match")]
    MissingRootBinding {
        /// The root capture name, without `@`.
        capture: String,
    },

    /// A placeholder left by parser recovery reached evaluation.
    #[error("{position}: malformed expression")]
    MalformedExpression {
        /// Position of the placeholder.
        position: Position,
    },

    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Serialising a dict failed.
    #[error("failed to serialise value: {0}")]
    Json(#[from] serde_json::Error),
}
