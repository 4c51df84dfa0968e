//! Token kinds produced by the lexer.

use std::fmt;

use strum::Display;

use crate::position::Span;

/// The lexical category of a token.
///
/// Kinds display in upper snake case (`IDENT`, `LCURLY_BRACKET`, ...), which
/// is the spelling used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// A `//` comment running to the end of the line.
    Comment,
    /// An identifier such as `print`, `_` or a capture such as `@id`.
    Ident,
    /// An integer literal such as `123`.
    Int,
    /// A floating point literal such as `1.5`.
    Float,
    /// A double-quoted string literal; the lexeme keeps its quotes.
    String,
    /// A backtick-delimited pattern literal; the lexeme keeps its backticks.
    Pattern,
    /// `{`
    #[strum(to_string = "LCURLY_BRACKET")]
    LCurlyBracket,
    /// `}`
    #[strum(to_string = "RCURLY_BRACKET")]
    RCurlyBracket,
    /// `[`
    #[strum(to_string = "LSQUARE_BRACKET")]
    LSquareBracket,
    /// `]`
    #[strum(to_string = "RSQUARE_BRACKET")]
    RSquareBracket,
    /// `(`
    #[strum(to_string = "LPAREN")]
    LParen,
    /// `)`
    #[strum(to_string = "RPAREN")]
    RParen,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `=`
    Equal,
    /// `!=`
    BangEqual,
    /// `==`
    EqualEqual,
    /// End of input. Always the last token of a stream.
    Eof,
}

/// A lexeme with its kind and starting byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token category.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub lit: String,
    /// Byte offset of the first character.
    pub pos: usize,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub fn new(kind: TokenKind, lit: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            lit: lit.into(),
            pos,
        }
    }

    /// Creates the end-of-input sentinel at `pos`.
    #[must_use]
    pub const fn eof(pos: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lit: String::new(),
            pos,
        }
    }

    /// Returns the source range covered by the lexeme.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.pos, self.pos.saturating_add(self.lit.len()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.lit)
        }
    }
}
