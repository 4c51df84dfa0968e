//! Builds syntax trees for input files.
//!
//! Tree-sitter is error-tolerant: a tree is produced even for broken input,
//! with `ERROR` and missing nodes marking the damage. Queries still run over
//! such trees, so callers typically report [`ParseResult::errors`] as warnings
//! rather than failing.

use std::fmt;
use std::ops::Range;

use crate::capture::point_to_one_based;
use crate::error::SyntaxError;
use crate::language::SupportedLanguage;

/// A parsed input buffer.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: Vec<u8>,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the bytes that were parsed.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree contains `ERROR` or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects the `ERROR` and missing nodes of the tree in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }
}

/// Location and description of one damaged region of a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// One-based line where the error starts.
    pub line: u32,
    /// One-based column where the error starts.
    pub column: u32,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>) -> Self {
        let (line, column) = point_to_one_based(node.start_position());
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            String::from("syntax error")
        };
        Self {
            byte_range: node.byte_range(),
            line,
            column,
            message,
        }
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Tree-sitter parser configured for one language.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the language grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses `source` into a syntax tree.
    ///
    /// The input is raw bytes; it need not be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter produces no tree at all, which only
    /// happens when the parser is misconfigured.
    pub fn parse(&mut self, source: impl Into<Vec<u8>>) -> Result<ParseResult, SyntaxError> {
        let bytes = source.into();
        let tree = self
            .inner
            .parse(&bytes, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;

        Ok(ParseResult {
            tree,
            source: bytes,
            language: self.language,
        })
    }
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<SyntaxErrorInfo>) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
