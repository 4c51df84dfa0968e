//! Error types for tree building and query execution.

use std::path::PathBuf;

use thiserror::Error;

use crate::language::SupportedLanguage;

/// Errors raised by the tree-sitter layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInitError {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// No language was given and none could be inferred from the file name.
    #[error(
        "could not determine language for {}; pass --language explicitly",
        path.display()
    )]
    UnknownLanguage {
        /// The input whose language could not be determined.
        path: PathBuf,
    },

    /// Failed to parse source code.
    #[error("failed to parse {language}: {message}")]
    ParseError {
        /// The language that failed to parse.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter rejected a query.
    #[error("invalid query for {language}: {message}")]
    QueryCompileError {
        /// The language the query was compiled for.
        language: SupportedLanguage,
        /// The tree-sitter diagnostic, including its row and column.
        message: String,
    },

    /// A query was run against a tree of another language.
    #[error("query for {query_language} cannot run on a {tree_language} tree")]
    LanguageMismatch {
        /// Language the query was compiled for.
        query_language: SupportedLanguage,
        /// Language of the syntax tree.
        tree_language: SupportedLanguage,
    },

    /// Match iteration stopped because the caller cancelled it or its
    /// deadline passed.
    #[error("query execution cancelled")]
    Cancelled,

    /// Internal error indicating a bug or system failure.
    #[error("internal error: {message}")]
    InternalError {
        /// Description of the internal error.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInitError {
            language,
            message: message.into(),
        }
    }

    /// Creates an unknown language error.
    #[must_use]
    pub fn unknown_language(path: impl Into<PathBuf>) -> Self {
        Self::UnknownLanguage { path: path.into() }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParseError {
            language,
            message: message.into(),
        }
    }

    /// Creates a query compilation error.
    #[must_use]
    pub fn query_compile(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::QueryCompileError {
            language,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
