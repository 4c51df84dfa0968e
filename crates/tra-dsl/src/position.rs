//! Source positions for program diagnostics.
//!
//! Offsets are byte indices into the program text. [`SourceFile`] records the
//! start offset of every line so an offset can be mapped to a one-based
//! line/column pair when a diagnostic is reported.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in the program text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an empty span located at `offset`.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the number of bytes covered by the span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` when the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Implemented by every syntax node that occupies a region of the program.
pub trait Spanned {
    /// Returns the half-open source range of the node.
    fn span(&self) -> Span;

    /// Returns the offset of the first byte of the node.
    fn pos(&self) -> usize {
        self.span().start
    }

    /// Returns the offset one past the last byte of the node.
    fn end(&self) -> usize {
        self.span().end
    }
}

/// A resolved, human-readable location in a program file.
///
/// Field order matters: the derived ordering sorts by file, then line, then
/// column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Name of the program file (`<inline>` for command-line programs).
    pub filename: String,
    /// One-based line number.
    pub line: u32,
    /// One-based column number, counted in bytes.
    pub column: u32,
    /// Zero-based byte offset.
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filename.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        }
    }
}

/// Line table for one program file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    name: String,
    len: usize,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Builds the line table for `src`.
    #[must_use]
    pub fn new(name: impl Into<String>, src: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            src.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(index, _)| index.saturating_add(1)),
        );
        Self {
            name: name.into(),
            len: src.len(),
            line_starts,
        }
    }

    /// Returns the file name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the length of the program text in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the program text is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maps a byte offset to a one-based line/column position.
    ///
    /// Offsets past the end of the file are clamped to the end.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.len);
        let line_index = self
            .line_starts
            .partition_point(|start| *start <= clamped)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line_index).copied().unwrap_or(0);
        Position {
            filename: self.name.clone(),
            line: one_based(line_index),
            column: one_based(clamped.saturating_sub(line_start)),
            offset: clamped,
        }
    }
}

fn one_based(index: usize) -> u32 {
    // Program files never approach u32::MAX lines or columns.
    u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX)
}
