//! Lexical analysis for tra programs.
//!
//! The lexer is total: every byte of the input ends up in exactly one token
//! or one diagnostic. Malformed lexemes (unterminated literals, stray
//! characters) are reported and skipped so a single pass reports as many
//! problems as possible.

use crate::diagnostic::Diagnostics;
use crate::position::SourceFile;
use crate::token::{Token, TokenKind};

/// Output of a complete lexing pass.
#[derive(Debug, Clone)]
pub struct Lexed {
    /// Tokens in source order, always terminated by an [`TokenKind::Eof`] token.
    pub tokens: Vec<Token>,
    /// Line table for the lexed file.
    pub file: SourceFile,
    /// Lexical errors, in the order they were found.
    pub diagnostics: Diagnostics,
}

/// Converts program text into tokens.
pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    file: SourceFile,
    diagnostics: Diagnostics,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer for `src`, reporting positions against `filename`.
    #[must_use]
    pub fn new(filename: &str, src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            file: SourceFile::new(filename, src),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Lexes the whole input.
    #[must_use]
    pub fn tokenize(mut self) -> Lexed {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens.push(Token::eof(self.src.len()));
        Lexed {
            tokens,
            file: self.file,
            diagnostics: self.diagnostics,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.bump_while(char::is_whitespace);
            let start = self.offset;
            let kind = match self.bump()? {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LCurlyBracket,
                '}' => TokenKind::RCurlyBracket,
                '[' => TokenKind::LSquareBracket,
                ']' => TokenKind::RSquareBracket,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Period,
                ';' => TokenKind::Semicolon,
                ':' => TokenKind::Colon,
                '*' => TokenKind::Star,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '/' if self.peek() == Some('/') => {
                    self.bump_while(|c| c != '\n');
                    TokenKind::Comment
                }
                '/' => TokenKind::Slash,
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
                '<' => self.either('=', TokenKind::LessEqual, TokenKind::Less),
                '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '"' => {
                    if !self.string_literal(start) {
                        continue;
                    }
                    TokenKind::String
                }
                '`' => {
                    if !self.pattern_literal(start) {
                        continue;
                    }
                    TokenKind::Pattern
                }
                c if c.is_ascii_digit() => self.number(),
                c if is_ident_start(c) => {
                    if c == '@' {
                        self.bump_while(is_capture_continue);
                    } else {
                        self.bump_while(is_ident_continue);
                    }
                    TokenKind::Ident
                }
                other => {
                    self.error(start, format!("invalid character {other:?}"));
                    continue;
                }
            };
            return Some(Token::new(kind, self.lexeme(start), start));
        }
    }

    fn string_literal(&mut self, start: usize) -> bool {
        loop {
            match self.bump() {
                Some('"') => return true,
                Some('\\') => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                Some('\n') | None => break,
                Some(_) => {}
            }
        }
        self.error(start, "unterminated string literal");
        false
    }

    fn pattern_literal(&mut self, start: usize) -> bool {
        self.bump_while(|c| c != '`');
        if self.bump().is_none() {
            self.error(start, "unterminated pattern literal");
            return false;
        }
        true
    }

    fn number(&mut self) -> TokenKind {
        self.bump_while(|c| c.is_ascii_digit());
        let fraction_follows = self.peek() == Some('.')
            && self.peek_second().is_some_and(|c| c.is_ascii_digit());
        if !fraction_follows {
            return TokenKind::Int;
        }
        self.bump();
        self.bump_while(|c| c.is_ascii_digit());
        TokenKind::Float
    }

    fn either(&mut self, next: char, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.bump();
            matched
        } else {
            single
        }
    }

    fn rest(&self) -> &'a str {
        self.src.get(self.offset..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset = self.offset.saturating_add(c.len_utf8());
        Some(c)
    }

    fn bump_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut predicate) {
            self.bump();
        }
    }

    fn lexeme(&self, start: usize) -> &'a str {
        self.src.get(start..self.offset).unwrap_or_default()
    }

    fn error(&mut self, offset: usize, message: impl Into<String>) {
        let position = self.file.position(offset);
        self.diagnostics.push(position, message);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '@' | '$')
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// Capture names follow tree-sitter, which also allows `-` and `.`.
const fn is_capture_continue(c: char) -> bool {
    is_ident_continue(c) || matches!(c, '-' | '.')
}

/// Lexes `src` in one call.
///
/// # Errors
///
/// Returns every lexical error found, sorted with one entry per line.
pub fn lex(filename: &str, src: &str) -> Result<Vec<Token>, Diagnostics> {
    let Lexed {
        tokens,
        mut diagnostics,
        ..
    } = Lexer::new(filename, src).tokenize();
    diagnostics.remove_multiples();
    diagnostics.into_result(tokens)
}
