//! Syntax tree for tra programs.
//!
//! Nodes record byte offsets of their delimiters so that every node can
//! report a half-open [`Span`] through [`Spanned`]. The tree is produced by
//! [`crate::parse`] and is immutable apart from symbol rewriting performed
//! through [`crate::walk_mut()`].

use std::borrow::Cow;

use crate::position::{SourceFile, Span, Spanned};

/// A parsed program: an ordered list of pattern/action rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Line table of the program text.
    pub file: SourceFile,
    /// Rules in declaration order.
    pub patterns: Vec<PatternAction>,
}

impl Program {
    /// Creates an empty program for `file`.
    #[must_use]
    pub const fn new(file: SourceFile) -> Self {
        Self {
            file,
            patterns: Vec::new(),
        }
    }
}

impl Spanned for Program {
    fn span(&self) -> Span {
        match (self.patterns.first(), self.patterns.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => Span::at(0),
        }
    }
}

/// One rule: a structural pattern and the action run for each match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternAction {
    /// The structural query.
    pub pattern: QueryPattern,
    /// Statements executed once per match.
    pub action: Action,
}

impl Spanned for PatternAction {
    fn span(&self) -> Span {
        self.pattern.span().to(self.action.span())
    }
}

/// An s-expression such as `(binary_expression left: (identifier)) @bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPattern {
    /// Offset of `(`.
    pub lparen: usize,
    /// The node type, possibly abbreviated.
    pub symbol: Ident,
    /// Children in source order.
    pub args: Vec<PatternArg>,
    /// Offset of `)`.
    pub rparen: usize,
    /// Optional trailing capture, including its `@`.
    pub capture: Option<Ident>,
}

impl QueryPattern {
    /// Returns the capture name with its leading `@` removed.
    #[must_use]
    pub fn capture_name(&self) -> Option<&str> {
        self.capture
            .as_ref()
            .map(|capture| capture.name.strip_prefix('@').unwrap_or(&capture.name))
    }
}

impl Spanned for QueryPattern {
    fn span(&self) -> Span {
        let end = self
            .capture
            .as_ref()
            .map_or_else(|| self.rparen.saturating_add(1), Spanned::end);
        Span::new(self.lparen, end)
    }
}

/// A child of a [`QueryPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternArg {
    /// A nested pattern.
    Pattern(QueryPattern),
    /// A field name such as `left:` qualifying the next child.
    Field(PatternField),
    /// An anonymous node written as a string, e.g. `"!="`.
    String(StringLit),
    /// A bare identifier such as the `_` wildcard.
    Wildcard(Ident),
    /// The `.` sibling anchor.
    Anchor(Anchor),
}

impl Spanned for PatternArg {
    fn span(&self) -> Span {
        match self {
            Self::Pattern(pattern) => pattern.span(),
            Self::Field(field) => field.span(),
            Self::String(string) => string.span(),
            Self::Wildcard(ident) => ident.span(),
            Self::Anchor(anchor) => anchor.span(),
        }
    }
}

/// A field name followed by `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternField {
    /// The field name.
    pub name: Ident,
    /// Offset of `:`.
    pub colon: usize,
}

impl Spanned for PatternField {
    fn span(&self) -> Span {
        Span::new(self.name.pos, self.colon.saturating_add(1))
    }
}

/// The `.` anchor between pattern children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Offset of `.`.
    pub pos: usize,
}

impl Spanned for Anchor {
    fn span(&self) -> Span {
        Span::new(self.pos, self.pos.saturating_add(1))
    }
}

/// A brace-delimited statement block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Offset of `{`.
    pub lbrace: usize,
    /// Statements in execution order.
    pub stmts: Vec<Stmt>,
    /// Offset of `}`.
    pub rbrace: usize,
}

impl Spanned for Action {
    fn span(&self) -> Span {
        Span::new(self.lbrace, self.rbrace.saturating_add(1))
    }
}

/// A statement inside an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// A built-in call such as `print(@)`.
    Call(Call),
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Call(call) => call.span(),
        }
    }
}

/// A function call statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The called function.
    pub name: Ident,
    /// Offset of `(`.
    pub lparen: usize,
    /// Arguments in order.
    pub args: Vec<Expr>,
    /// Offset of `)`.
    pub rparen: usize,
}

impl Spanned for Call {
    fn span(&self) -> Span {
        Span::new(self.name.pos, self.rparen.saturating_add(1))
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A variable reference such as `@` or `@id`.
    Ident(Ident),
    /// A decimal integer literal.
    Int(IntLit),
    /// A string literal.
    String(StringLit),
    /// A dict literal.
    Dict(Dict),
    /// Placeholder for source the parser could not make sense of.
    Bad(BadExpr),
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Ident(ident) => ident.span(),
            Self::Int(int) => int.span(),
            Self::String(string) => string.span(),
            Self::Dict(dict) => dict.span(),
            Self::Bad(bad) => bad.span,
        }
    }
}

/// A `{key: value, ...}` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dict {
    /// Offset of `{`.
    pub lbrace: usize,
    /// Entries in source order.
    pub entries: Vec<DictEntry>,
    /// Offset of `}`.
    pub rbrace: usize,
}

impl Spanned for Dict {
    fn span(&self) -> Span {
        Span::new(self.lbrace, self.rbrace.saturating_add(1))
    }
}

/// One `key: value` pair of a [`Dict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    /// The key expression. A bare identifier is looked up as a variable
    /// first and used as a literal name when unbound.
    pub key: Expr,
    /// Offset of `:`, absent when recovery skipped it.
    pub colon: Option<usize>,
    /// The value expression.
    pub value: Expr,
    /// Offset of the trailing `,`, if any.
    pub comma: Option<usize>,
}

impl Spanned for DictEntry {
    fn span(&self) -> Span {
        let end = self
            .comma
            .map_or_else(|| self.value.end(), |comma| comma.saturating_add(1));
        Span::new(self.key.pos(), end)
    }
}

/// An identifier, capture name or variable reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Offset of the first character.
    pub pos: usize,
    /// The identifier text, including any leading `@`.
    pub name: String,
}

impl Ident {
    /// Creates an identifier.
    #[must_use]
    pub fn new(pos: usize, name: impl Into<String>) -> Self {
        Self {
            pos,
            name: name.into(),
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        Span::new(self.pos, self.pos.saturating_add(self.name.len()))
    }
}

/// A decimal integer literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntLit {
    /// Offset of the first digit.
    pub pos: usize,
    /// The literal as written.
    pub raw: String,
    /// The parsed value.
    pub value: i64,
}

impl Spanned for IntLit {
    fn span(&self) -> Span {
        Span::new(self.pos, self.pos.saturating_add(self.raw.len()))
    }
}

/// A double-quoted string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLit {
    /// Offset of the opening quote.
    pub pos: usize,
    /// Text between the quotes, escapes left as written.
    pub raw: String,
}

impl StringLit {
    /// Creates a string literal from the text between its quotes.
    #[must_use]
    pub fn new(pos: usize, raw: impl Into<String>) -> Self {
        Self {
            pos,
            raw: raw.into(),
        }
    }

    /// Returns the literal with escape sequences interpreted.
    ///
    /// `\n`, `\t`, `\r`, `\"` and `\\` are recognised; any other escaped
    /// character stands for itself.
    #[must_use]
    pub fn value(&self) -> Cow<'_, str> {
        if !self.raw.contains('\\') {
            return Cow::Borrowed(&self.raw);
        }
        let mut out = String::with_capacity(self.raw.len());
        let mut chars = self.raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        }
        Cow::Owned(out)
    }
}

impl Spanned for StringLit {
    fn span(&self) -> Span {
        // The quotes are part of the literal.
        Span::new(self.pos, self.pos.saturating_add(self.raw.len()).saturating_add(2))
    }
}

/// A region of source that failed to parse as an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadExpr {
    /// The skipped source range.
    pub span: Span,
}
