//! Renders syntax trees back to program text.
//!
//! Each rule is printed on a single line. The output of a pattern is also the
//! exact query text handed to tree-sitter, so pattern rendering must stay
//! valid tree-sitter query syntax.

use std::fmt::{self, Display, Formatter, Write as _};

use crate::ast::{
    Action, Anchor, BadExpr, Call, Dict, DictEntry, Expr, Ident, IntLit, PatternAction,
    PatternArg, PatternField, Program, QueryPattern, Stmt, StringLit,
};
use crate::walk::Node;

/// Renders a whole program, one rule per line.
#[must_use]
pub fn format_program(program: &Program) -> String {
    program.to_string()
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rule in &self.patterns {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl Display for PatternAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)?;
        if self.pattern.capture.is_some() {
            f.write_char(' ')?;
        }
        write!(f, "{}", self.action)
    }
}

impl Display for QueryPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.symbol)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        f.write_char(')')?;
        if let Some(capture) = &self.capture {
            write!(f, " {capture}")?;
        }
        Ok(())
    }
}

impl Display for PatternArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => pattern.fmt(f),
            Self::Field(field) => field.fmt(f),
            Self::String(string) => string.fmt(f),
            Self::Wildcard(ident) => ident.fmt(f),
            Self::Anchor(anchor) => anchor.fmt(f),
        }
    }
}

impl Display for PatternField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)
    }
}

impl Display for Anchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('.')
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for (index, stmt) in self.stmts.iter().enumerate() {
            if index > 0 {
                f.write_char(';')?;
            }
            write!(f, "{stmt}")?;
        }
        f.write_char('}')
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call(call) => call.fmt(f),
        }
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_char(',')?;
            }
            write!(f, "{arg}")?;
        }
        f.write_char(')')
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(ident) => ident.fmt(f),
            Self::Int(int) => int.fmt(f),
            Self::String(string) => string.fmt(f),
            Self::Dict(dict) => dict.fmt(f),
            Self::Bad(bad) => bad.fmt(f),
        }
    }
}

impl Display for Dict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        let mut entries = self.entries.iter().peekable();
        while let Some(entry) = entries.next() {
            write!(f, "{entry}")?;
            // Adjacent entries need a separator to lex apart again.
            if entry.comma.is_none() && entries.peek().is_some() {
                f.write_char(',')?;
            }
        }
        f.write_char('}')
    }
}

impl Display for DictEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if self.colon.is_some() {
            f.write_char(':')?;
        }
        write!(f, "{}", self.value)?;
        if self.comma.is_some() {
            f.write_char(',')?;
        }
        Ok(())
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Display for IntLit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Display for StringLit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.raw)
    }
}

impl Display for BadExpr {
    fn fmt(&self, _f: &mut Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program(node) => node.fmt(f),
            Self::PatternAction(node) => node.fmt(f),
            Self::QueryPattern(node) => node.fmt(f),
            Self::PatternField(node) => node.fmt(f),
            Self::Anchor(node) => node.fmt(f),
            Self::Action(node) => node.fmt(f),
            Self::Call(node) => node.fmt(f),
            Self::Dict(node) => node.fmt(f),
            Self::DictEntry(node) => node.fmt(f),
            Self::Ident(node) => node.fmt(f),
            Self::Int(node) => node.fmt(f),
            Self::String(node) => node.fmt(f),
            Self::BadExpr(node) => node.fmt(f),
        }
    }
}
