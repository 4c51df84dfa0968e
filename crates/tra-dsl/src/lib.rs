//! Front end for the tra pattern/action language.
//!
//! A tra program is a list of rules. Each rule pairs a tree-sitter style
//! structural pattern with an action block that runs once per match:
//!
//! ```text
//! (call_expression function: (identifier) @fn) @call { print({name: @fn, at: @call}) }
//! ```
//!
//! This crate turns program text into a syntax tree and back:
//!
//! - [`lex`] and [`Lexer`] produce [`Token`]s
//! - [`parse`] and [`parse_file`] build a [`Program`], collecting every
//!   syntax error as a [`Diagnostic`]
//! - [`walk()`] and [`walk_mut()`] traverse the tree in pre-order
//! - [`format_program`] (and the `Display` impls) render it back to text
//!
//! Node type names in patterns may be abbreviated; they are only resolved
//! against a grammar at evaluation time, so formatting a parsed program
//! reproduces the names as written.

mod ast;
mod diagnostic;
mod format;
mod lexer;
mod parser;
mod position;
mod token;
mod walk;

pub use ast::{
    Action, Anchor, BadExpr, Call, Dict, DictEntry, Expr, Ident, IntLit, PatternAction,
    PatternArg, PatternField, Program, QueryPattern, Stmt, StringLit,
};
pub use diagnostic::{Diagnostic, Diagnostics};
pub use format::format_program;
pub use lexer::{Lexed, Lexer, lex};
pub use parser::{Parsed, parse, parse_file};
pub use position::{Position, SourceFile, Span, Spanned};
pub use token::{Token, TokenKind};
pub use walk::{
    Node, NodeMut, VisitFn, VisitFnMut, Visitor, VisitorMut, visit_fn, visit_fn_mut, walk,
    walk_mut,
};

#[cfg(test)]
mod tests;
