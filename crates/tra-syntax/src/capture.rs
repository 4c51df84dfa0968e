//! Nodes bound to capture names by a query match.

use std::borrow::Cow;
use std::ops::Range;

/// A syntax node together with the source it was parsed from.
///
/// The bytes are a slice of the parsed buffer; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct CapturedNode<'a> {
    node: tree_sitter::Node<'a>,
    source: &'a [u8],
}

impl<'a> CapturedNode<'a> {
    /// Pairs `node` with the `source` it was parsed from.
    #[must_use]
    pub const fn new(node: tree_sitter::Node<'a>, source: &'a [u8]) -> Self {
        Self { node, source }
    }

    /// Returns the captured syntax node.
    #[must_use]
    pub const fn node(&self) -> tree_sitter::Node<'a> {
        self.node
    }

    /// Returns the full source buffer the node belongs to.
    #[must_use]
    pub const fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Returns the exact source bytes spanned by the node.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    /// Returns the node text, with invalid UTF-8 replaced by `U+FFFD`.
    #[must_use]
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes())
    }

    /// Returns the byte range of the node.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    /// Returns the grammar node type, e.g. `identifier`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Returns the one-based line and column of the node start.
    #[must_use]
    pub fn start_position(&self) -> (u32, u32) {
        point_to_one_based(self.node.start_position())
    }
}

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}
