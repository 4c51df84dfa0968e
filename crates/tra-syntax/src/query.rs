//! Compiled tree-sitter queries and match iteration.
//!
//! A [`Query`] is compiled once per language and can then be run over any
//! number of trees of that language. Matches are produced lazily by
//! [`QueryMatches`], which checks a [`Cancellation`] before each one.

use tree_sitter::StreamingIterator;

use crate::cancel::Cancellation;
use crate::capture::CapturedNode;
use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::parser::ParseResult;

/// A tree-sitter query compiled for one language.
#[derive(Debug)]
pub struct Query {
    inner: tree_sitter::Query,
    language: SupportedLanguage,
    text: String,
}

impl Query {
    /// Compiles `text` for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::QueryCompileError`] when tree-sitter rejects
    /// the query, for example because it names a node type the grammar does
    /// not define.
    pub fn compile(text: impl Into<String>, language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let source = text.into();
        let inner = tree_sitter::Query::new(&language.tree_sitter_language(), &source)
            .map_err(|err| SyntaxError::query_compile(language, err.to_string()))?;
        Ok(Self {
            inner,
            language,
            text: source,
        })
    }

    /// Returns the query source.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the language the query was compiled for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the capture names in index order, without the `@` prefix.
    #[must_use]
    pub fn capture_names(&self) -> &[&str] {
        self.inner.capture_names()
    }

    /// Starts iterating the matches of this query over `parsed`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::LanguageMismatch`] when the tree was parsed
    /// with a different grammar.
    pub fn matches<'a>(
        &'a self,
        cursor: &'a mut MatchCursor,
        parsed: &'a ParseResult,
        cancellation: &'a Cancellation,
    ) -> Result<QueryMatches<'a>, SyntaxError> {
        if parsed.language() != self.language {
            return Err(SyntaxError::LanguageMismatch {
                query_language: self.language,
                tree_language: parsed.language(),
            });
        }
        let source = parsed.source();
        let inner = cursor
            .inner
            .matches(&self.inner, parsed.root_node(), source);
        Ok(QueryMatches {
            inner,
            query: self,
            source,
            cancellation,
            finished: false,
        })
    }
}

/// Reusable cursor state for running queries.
pub struct MatchCursor {
    inner: tree_sitter::QueryCursor,
}

impl MatchCursor {
    /// Creates a fresh cursor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tree_sitter::QueryCursor::new(),
        }
    }
}

impl Default for MatchCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily produced matches of a [`Query`].
///
/// Yields `Err(SyntaxError::Cancelled)` once when the cancellation fires,
/// then ends.
pub struct QueryMatches<'a> {
    inner: tree_sitter::QueryMatches<'a, 'a, &'a [u8], &'a [u8]>,
    query: &'a Query,
    source: &'a [u8],
    cancellation: &'a Cancellation,
    finished: bool,
}

impl<'a> Iterator for QueryMatches<'a> {
    type Item = Result<QueryMatch<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.cancellation.is_cancelled() {
            self.finished = true;
            return Some(Err(SyntaxError::Cancelled));
        }
        let Some(found) = self.inner.next() else {
            self.finished = true;
            return None;
        };

        let names = self.query.capture_names();
        let mut captures = Vec::with_capacity(found.captures.len());
        for capture in found.captures {
            let name = usize::try_from(capture.index)
                .ok()
                .and_then(|index| names.get(index).copied());
            let Some(capture_name) = name else {
                self.finished = true;
                return Some(Err(SyntaxError::internal_error(format!(
                    "capture index {} out of range",
                    capture.index
                ))));
            };
            captures.push(Capture {
                name: capture_name,
                node: CapturedNode::new(capture.node, self.source),
            });
        }
        Some(Ok(QueryMatch {
            pattern_index: found.pattern_index,
            captures,
        }))
    }
}

/// One match of a query.
#[derive(Debug, Clone)]
pub struct QueryMatch<'a> {
    /// Index of the query pattern that matched.
    pub pattern_index: usize,
    /// Captured nodes in the order tree-sitter reports them.
    pub captures: Vec<Capture<'a>>,
}

impl<'a> QueryMatch<'a> {
    /// Returns the first node captured under `name`.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<CapturedNode<'a>> {
        self.captures
            .iter()
            .find(|capture| capture.name == name)
            .map(|capture| capture.node)
    }
}

/// A node bound to a capture name.
#[derive(Debug, Clone, Copy)]
pub struct Capture<'a> {
    /// Capture name without the `@` prefix.
    pub name: &'a str,
    /// The captured node.
    pub node: CapturedNode<'a>,
}
