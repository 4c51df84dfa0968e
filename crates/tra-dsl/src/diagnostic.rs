//! Diagnostics produced while lexing and parsing programs.
//!
//! Every lexical or syntax problem becomes a [`Diagnostic`] carrying a
//! resolved [`Position`]. The lexer and parser accumulate them in a
//! [`Diagnostics`] list instead of stopping at the first problem; the list is
//! sorted and thinned to one entry per line before it is reported.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// A single positioned error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{position}: {message}")]
pub struct Diagnostic {
    position: Position,
    message: String,
}

impl Diagnostic {
    /// Creates a diagnostic at `position`.
    #[must_use]
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Returns the location the diagnostic refers to.
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn summary(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => String::from("no errors"),
        [only] => only.to_string(),
        [first, _] => format!("{first} (and 1 more error)"),
        [first, rest @ ..] => format!("{first} (and {} more errors)", rest.len()),
    }
}

/// An ordered collection of diagnostics.
///
/// Used as the error type of [`crate::lex`] and [`crate::parse_file`].
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error,
)]
#[error("{}", summary(&self.diagnostics))]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, position: Position, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(position, message));
    }

    /// Sorts diagnostics by file, line, column and message.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|left, right| {
            left.position
                .cmp(&right.position)
                .then_with(|| left.message.cmp(&right.message))
        });
    }

    /// Sorts the list and keeps only the first diagnostic reported on each
    /// line of each file.
    pub fn remove_multiples(&mut self) {
        self.sort();
        self.diagnostics.dedup_by(|later, kept| {
            later.position.filename == kept.position.filename
                && later.position.line == kept.position.line
        });
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` when no diagnostics were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the diagnostics as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterates over the diagnostics in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns `Ok(value)` when the list is empty and `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the list itself when it contains at least one diagnostic.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(line: u32, column: u32) -> Position {
        Position {
            filename: String::from("prog.tra"),
            line,
            column,
            offset: 0,
        }
    }

    #[test]
    fn remove_multiples_keeps_first_error_per_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(at(2, 5), "second line, later column");
        diagnostics.push(at(1, 3), "first line");
        diagnostics.push(at(2, 1), "second line");
        diagnostics.push(at(1, 9), "first line again");

        diagnostics.remove_multiples();

        let messages: Vec<_> = diagnostics.iter().map(Diagnostic::message).collect();
        assert_eq!(messages, vec!["first line", "second line"]);
    }

    #[rstest]
    #[case(1, "prog.tra:1:1: unexpected token")]
    #[case(2, "prog.tra:1:1: unexpected token (and 1 more error)")]
    #[case(3, "prog.tra:1:1: unexpected token (and 2 more errors)")]
    fn display_summarises_remaining_errors(#[case] count: u32, #[case] expected: &str) {
        let diagnostics: Diagnostics =
            std::iter::once(Diagnostic::new(at(1, 1), "unexpected token"))
                .chain((2..=count).map(|line| Diagnostic::new(at(line, 2), "expected RPAREN")))
                .collect();

        assert_eq!(diagnostics.to_string(), expected);
    }

    #[test]
    fn into_result_is_ok_only_when_empty() {
        assert_eq!(Diagnostics::new().into_result(7), Ok(7));

        let mut diagnostics = Diagnostics::new();
        diagnostics.push(at(1, 1), "boom");
        assert!(diagnostics.into_result(()).is_err());
    }
}
