//! Target languages and their Tree-sitter grammars.
//!
//! [`SupportedLanguage`] names a grammar, detects it from file names, and
//! lists the node type names the grammar defines. Those names feed the
//! abbreviation resolver.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::error::SyntaxError;

/// Languages that programs can be evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SupportedLanguage {
    /// Rust source files (`.rs`).
    Rust,
    /// Python source files (`.py`, `.pyi`).
    Python,
    /// TypeScript and JavaScript files, parsed with the TSX grammar.
    TypeScript,
    /// Go source files (`.go`).
    Go,
    /// Java source files (`.java`).
    Java,
}

impl SupportedLanguage {
    /// Detects the language from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs" => Some(Self::TypeScript),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Detects the language from a file path by examining its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Picks the language for an input: `explicit` wins, otherwise the
    /// extension of `path` decides.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnknownLanguage`] when no language was given
    /// and the extension is missing or unrecognised.
    pub fn resolve(path: &Path, explicit: Option<Self>) -> Result<Self, SyntaxError> {
        explicit
            .or_else(|| Self::from_path(path))
            .ok_or_else(|| SyntaxError::unknown_language(path))
    }

    /// Returns the Tree-sitter language grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            // TSX is a superset that also accepts plain TypeScript and JavaScript.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }

    /// Returns every node type name defined by the grammar, sorted and
    /// without duplicates.
    ///
    /// Named and anonymous node types are both included; grammars reuse a
    /// name for several internal symbols, hence the deduplication.
    #[must_use]
    pub fn symbol_names(self) -> BTreeSet<&'static str> {
        let language = self.tree_sitter_language();
        (0..language.node_kind_count())
            .filter_map(|id| u16::try_from(id).ok())
            .filter_map(|id| language.node_kind_for_id(id))
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Returns the lower-case identifier for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::Go => "go",
            Self::Java => "java",
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a language identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "python" | "py" => Ok(Self::Python),
            "typescript" | "ts" | "tsx" | "javascript" | "js" => Ok(Self::TypeScript),
            "go" | "golang" => Ok(Self::Go),
            "java" => Ok(Self::Java),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}
