//! Recursive-descent parser for tra programs.
//!
//! The parser never stops at the first error. Descent functions return
//! `Result<_, Bailout>`; a bailout has already recorded its diagnostic and
//! unwinds to the rule loop, which skips ahead to the next rule (a `(` after
//! a `}` or at the start of a line) and carries on. Dict literals recover
//! locally so a single bad entry costs one diagnostic.

mod action;
mod pattern;

use crate::ast::{Ident, Program, StringLit};
use crate::diagnostic::Diagnostics;
use crate::lexer::{Lexed, Lexer};
use crate::position::SourceFile;
use crate::token::{Token, TokenKind};

/// Result of parsing: a best-effort program plus everything that went wrong.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// The rules that parsed successfully.
    pub program: Program,
    /// Lexical or syntax errors, sorted with one entry per line.
    pub diagnostics: Diagnostics,
}

impl Parsed {
    /// Returns the program if no diagnostics were recorded.
    ///
    /// # Errors
    ///
    /// Returns the diagnostics when there is at least one.
    pub fn into_result(self) -> Result<Program, Diagnostics> {
        self.diagnostics.into_result(self.program)
    }
}

/// Parses `src`, always returning a usable tree.
///
/// Lexical errors are reported on their own; the parser only runs over a
/// clean token stream.
#[must_use]
pub fn parse(filename: &str, src: &str) -> Parsed {
    let Lexed {
        tokens,
        file,
        mut diagnostics,
    } = Lexer::new(filename, src).tokenize();
    if !diagnostics.is_empty() {
        diagnostics.remove_multiples();
        return Parsed {
            program: Program::new(file),
            diagnostics,
        };
    }
    Parser::new(tokens, file).parse_program()
}

/// Parses `src`, failing if any error was found.
///
/// # Errors
///
/// Returns every lexical or syntax error, sorted by position with at most
/// one diagnostic per line.
pub fn parse_file(filename: &str, src: &str) -> Result<Program, Diagnostics> {
    parse(filename, src).into_result()
}

/// Signals that a descent function gave up. The diagnostic has already been
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bailout;

pub(crate) type PResult<T> = Result<T, Bailout>;

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    last: Option<Token>,
    eof: Token,
    file: SourceFile,
    diagnostics: Diagnostics,
}

impl Parser {
    fn new(tokens: Vec<Token>, file: SourceFile) -> Self {
        let eof = tokens
            .last()
            .filter(|token| token.kind == TokenKind::Eof)
            .cloned()
            .unwrap_or_else(|| Token::eof(file.len()));
        Self {
            tokens,
            pos: 0,
            last: None,
            eof,
            file,
            diagnostics: Diagnostics::new(),
        }
    }

    fn parse_program(mut self) -> Parsed {
        let mut patterns = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::LParen => match self.parse_pattern_action() {
                    Ok(rule) => patterns.push(rule),
                    Err(Bailout) => self.synchronize(),
                },
                _ => {
                    self.error(
                        token.pos,
                        format!("unexpected token {token}, wanted pattern or action block"),
                    );
                    self.bump();
                    self.synchronize();
                }
            }
        }
        self.diagnostics.remove_multiples();
        Parsed {
            program: Program {
                file: self.file,
                patterns,
            },
            diagnostics: self.diagnostics,
        }
    }

    /// Skips to the start of the next rule.
    fn synchronize(&mut self) {
        while self.peek().kind != TokenKind::Eof && !self.at_rule_start() {
            self.bump();
        }
    }

    /// A rule starts at a `(` that follows a `}` or begins a new line.
    fn at_rule_start(&self) -> bool {
        let next = self.peek();
        if next.kind != TokenKind::LParen {
            return false;
        }
        self.last.as_ref().is_none_or(|last| {
            last.kind == TokenKind::RCurlyBracket
                || self.file.position(last.pos).line < self.file.position(next.pos).line
        })
    }

    /// Skips tokens until one of `sync` is next and returns its offset.
    fn skip_to(&mut self, sync: &[TokenKind]) -> usize {
        while !sync.contains(&self.peek().kind) && self.peek().kind != TokenKind::Eof {
            self.bump();
        }
        self.peek().pos
    }

    fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .get(self.pos..)
            .unwrap_or_default()
            .iter()
            .filter(|token| token.kind != TokenKind::Comment)
    }

    fn peek(&self) -> &Token {
        self.significant().next().unwrap_or(&self.eof)
    }

    fn peek_second(&self) -> TokenKind {
        self.significant()
            .nth(1)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Consumes the next significant token. The end-of-input token is never
    /// consumed.
    fn bump(&mut self) -> Token {
        while let Some(token) = self.tokens.get(self.pos) {
            if token.kind == TokenKind::Eof {
                return token.clone();
            }
            self.pos = self.pos.saturating_add(1);
            if token.kind != TokenKind::Comment {
                self.last = Some(token.clone());
                return token.clone();
            }
        }
        self.eof.clone()
    }

    /// Consumes the next token if it has the given kind and returns its
    /// offset.
    fn eat(&mut self, kind: TokenKind) -> Option<usize> {
        (self.peek().kind == kind).then(|| self.bump().pos)
    }

    /// Consumes a token of the given kind or bails out without consuming.
    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        let token = self.peek().clone();
        if token.kind == kind {
            self.bump();
            Ok(token)
        } else {
            Err(self.bail(token.pos, format!("expected {kind}, got {token}")))
        }
    }

    fn parse_ident(&mut self) -> PResult<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident::new(token.pos, token.lit))
    }

    fn parse_string(&mut self) -> PResult<StringLit> {
        let token = self.expect(TokenKind::String)?;
        let raw = token
            .lit
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(&token.lit);
        Ok(StringLit::new(token.pos, raw))
    }

    fn error(&mut self, offset: usize, message: impl Into<String>) {
        let position = self.file.position(offset);
        self.diagnostics.push(position, message);
    }

    fn bail(&mut self, offset: usize, message: impl Into<String>) -> Bailout {
        self.error(offset, message);
        Bailout
    }
}
