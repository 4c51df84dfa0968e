//! Depth-first, pre-order traversal of the syntax tree.
//!
//! A visitor is called on every node, parent before children, in source
//! order. Returning [`ControlFlow::Break`] stops the walk immediately and the
//! break value is handed back to the caller of [`walk()`] or [`walk_mut()`].

use std::marker::PhantomData;
use std::ops::ControlFlow;

use crate::ast::{
    Action, Anchor, BadExpr, Call, Dict, DictEntry, Expr, Ident, IntLit, PatternAction,
    PatternArg, PatternField, Program, QueryPattern, Stmt, StringLit,
};
use crate::position::{Span, Spanned};

/// A shared reference to any syntax node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// See [`Program`].
    Program(&'a Program),
    /// See [`PatternAction`].
    PatternAction(&'a PatternAction),
    /// See [`QueryPattern`].
    QueryPattern(&'a QueryPattern),
    /// See [`PatternField`].
    PatternField(&'a PatternField),
    /// See [`Anchor`].
    Anchor(&'a Anchor),
    /// See [`Action`].
    Action(&'a Action),
    /// See [`Call`].
    Call(&'a Call),
    /// See [`Dict`].
    Dict(&'a Dict),
    /// See [`DictEntry`].
    DictEntry(&'a DictEntry),
    /// See [`Ident`].
    Ident(&'a Ident),
    /// See [`IntLit`].
    Int(&'a IntLit),
    /// See [`StringLit`].
    String(&'a StringLit),
    /// See [`BadExpr`].
    BadExpr(&'a BadExpr),
}

impl Node<'_> {
    /// Returns the name of the node type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Program(_) => "Program",
            Self::PatternAction(_) => "PatternAction",
            Self::QueryPattern(_) => "QueryPattern",
            Self::PatternField(_) => "PatternField",
            Self::Anchor(_) => "Anchor",
            Self::Action(_) => "Action",
            Self::Call(_) => "Call",
            Self::Dict(_) => "Dict",
            Self::DictEntry(_) => "DictEntry",
            Self::Ident(_) => "Ident",
            Self::Int(_) => "Int",
            Self::String(_) => "String",
            Self::BadExpr(_) => "BadExpr",
        }
    }
}

impl Spanned for Node<'_> {
    fn span(&self) -> Span {
        match self {
            Self::Program(node) => node.span(),
            Self::PatternAction(node) => node.span(),
            Self::QueryPattern(node) => node.span(),
            Self::PatternField(node) => node.span(),
            Self::Anchor(node) => node.span(),
            Self::Action(node) => node.span(),
            Self::Call(node) => node.span(),
            Self::Dict(node) => node.span(),
            Self::DictEntry(node) => node.span(),
            Self::Ident(node) => node.span(),
            Self::Int(node) => node.span(),
            Self::String(node) => node.span(),
            Self::BadExpr(node) => node.span,
        }
    }
}

/// A mutable reference to any syntax node.
#[derive(Debug)]
pub enum NodeMut<'a> {
    /// See [`Program`].
    Program(&'a mut Program),
    /// See [`PatternAction`].
    PatternAction(&'a mut PatternAction),
    /// See [`QueryPattern`].
    QueryPattern(&'a mut QueryPattern),
    /// See [`PatternField`].
    PatternField(&'a mut PatternField),
    /// See [`Anchor`].
    Anchor(&'a mut Anchor),
    /// See [`Action`].
    Action(&'a mut Action),
    /// See [`Call`].
    Call(&'a mut Call),
    /// See [`Dict`].
    Dict(&'a mut Dict),
    /// See [`DictEntry`].
    DictEntry(&'a mut DictEntry),
    /// See [`Ident`].
    Ident(&'a mut Ident),
    /// See [`IntLit`].
    Int(&'a mut IntLit),
    /// See [`StringLit`].
    String(&'a mut StringLit),
    /// See [`BadExpr`].
    BadExpr(&'a mut BadExpr),
}

impl NodeMut<'_> {
    /// Borrows the node again for a shorter lifetime.
    pub fn reborrow(&mut self) -> NodeMut<'_> {
        match self {
            Self::Program(node) => NodeMut::Program(node),
            Self::PatternAction(node) => NodeMut::PatternAction(node),
            Self::QueryPattern(node) => NodeMut::QueryPattern(node),
            Self::PatternField(node) => NodeMut::PatternField(node),
            Self::Anchor(node) => NodeMut::Anchor(node),
            Self::Action(node) => NodeMut::Action(node),
            Self::Call(node) => NodeMut::Call(node),
            Self::Dict(node) => NodeMut::Dict(node),
            Self::DictEntry(node) => NodeMut::DictEntry(node),
            Self::Ident(node) => NodeMut::Ident(node),
            Self::Int(node) => NodeMut::Int(node),
            Self::String(node) => NodeMut::String(node),
            Self::BadExpr(node) => NodeMut::BadExpr(node),
        }
    }
}

/// Receives every node of a shared walk.
pub trait Visitor<'ast> {
    /// Value returned when the visitor stops the walk early.
    type Break;

    /// Called once per node, before the node's children.
    fn visit(&mut self, node: Node<'ast>) -> ControlFlow<Self::Break>;
}

/// Receives every node of a mutable walk.
pub trait VisitorMut {
    /// Value returned when the visitor stops the walk early.
    type Break;

    /// Called once per node, before the node's children. Changes made to the
    /// node are visible when its children are walked.
    fn visit(&mut self, node: NodeMut<'_>) -> ControlFlow<Self::Break>;
}

/// Adapts a closure into a [`Visitor`]. Built by [`visit_fn`].
pub struct VisitFn<F, B> {
    f: F,
    _break: PhantomData<fn() -> B>,
}

impl<'ast, F, B> Visitor<'ast> for VisitFn<F, B>
where
    F: FnMut(Node<'ast>) -> ControlFlow<B>,
{
    type Break = B;

    fn visit(&mut self, node: Node<'ast>) -> ControlFlow<B> {
        (self.f)(node)
    }
}

/// Wraps `f` as a [`Visitor`].
pub const fn visit_fn<'ast, F, B>(f: F) -> VisitFn<F, B>
where
    F: FnMut(Node<'ast>) -> ControlFlow<B>,
{
    VisitFn {
        f,
        _break: PhantomData,
    }
}

/// Adapts a closure into a [`VisitorMut`]. Built by [`visit_fn_mut`].
pub struct VisitFnMut<F, B> {
    f: F,
    _break: PhantomData<fn() -> B>,
}

impl<F, B> VisitorMut for VisitFnMut<F, B>
where
    F: FnMut(NodeMut<'_>) -> ControlFlow<B>,
{
    type Break = B;

    fn visit(&mut self, node: NodeMut<'_>) -> ControlFlow<B> {
        (self.f)(node)
    }
}

/// Wraps `f` as a [`VisitorMut`].
pub const fn visit_fn_mut<F, B>(f: F) -> VisitFnMut<F, B>
where
    F: FnMut(NodeMut<'_>) -> ControlFlow<B>,
{
    VisitFnMut {
        f,
        _break: PhantomData,
    }
}

/// Walks `node` and its descendants with a shared visitor.
pub fn walk<'ast, V>(node: Node<'ast>, visitor: &mut V) -> ControlFlow<V::Break>
where
    V: Visitor<'ast> + ?Sized,
{
    visitor.visit(node)?;
    match node {
        Node::Program(program) => {
            for rule in &program.patterns {
                walk(Node::PatternAction(rule), visitor)?;
            }
        }
        Node::PatternAction(rule) => {
            walk(Node::QueryPattern(&rule.pattern), visitor)?;
            walk(Node::Action(&rule.action), visitor)?;
        }
        Node::QueryPattern(pattern) => {
            walk(Node::Ident(&pattern.symbol), visitor)?;
            for arg in &pattern.args {
                walk(pattern_arg(arg), visitor)?;
            }
            if let Some(capture) = &pattern.capture {
                walk(Node::Ident(capture), visitor)?;
            }
        }
        Node::PatternField(field) => walk(Node::Ident(&field.name), visitor)?,
        Node::Action(action) => {
            for Stmt::Call(call) in &action.stmts {
                walk(Node::Call(call), visitor)?;
            }
        }
        Node::Call(call) => {
            walk(Node::Ident(&call.name), visitor)?;
            for arg in &call.args {
                walk(expr_node(arg), visitor)?;
            }
        }
        Node::Dict(dict) => {
            for entry in &dict.entries {
                walk(Node::DictEntry(entry), visitor)?;
            }
        }
        Node::DictEntry(entry) => {
            walk(expr_node(&entry.key), visitor)?;
            walk(expr_node(&entry.value), visitor)?;
        }
        Node::Anchor(_) | Node::Ident(_) | Node::Int(_) | Node::String(_) | Node::BadExpr(_) => {}
    }
    ControlFlow::Continue(())
}

const fn pattern_arg(arg: &PatternArg) -> Node<'_> {
    match arg {
        PatternArg::Pattern(pattern) => Node::QueryPattern(pattern),
        PatternArg::Field(field) => Node::PatternField(field),
        PatternArg::String(string) => Node::String(string),
        PatternArg::Wildcard(ident) => Node::Ident(ident),
        PatternArg::Anchor(anchor) => Node::Anchor(anchor),
    }
}

const fn expr_node(expr: &Expr) -> Node<'_> {
    match expr {
        Expr::Ident(ident) => Node::Ident(ident),
        Expr::Int(int) => Node::Int(int),
        Expr::String(string) => Node::String(string),
        Expr::Dict(dict) => Node::Dict(dict),
        Expr::Bad(bad) => Node::BadExpr(bad),
    }
}

/// Walks `node` and its descendants with a mutating visitor.
pub fn walk_mut<V>(mut node: NodeMut<'_>, visitor: &mut V) -> ControlFlow<V::Break>
where
    V: VisitorMut + ?Sized,
{
    visitor.visit(node.reborrow())?;
    match node {
        NodeMut::Program(program) => {
            for rule in &mut program.patterns {
                walk_mut(NodeMut::PatternAction(rule), visitor)?;
            }
        }
        NodeMut::PatternAction(rule) => {
            walk_mut(NodeMut::QueryPattern(&mut rule.pattern), visitor)?;
            walk_mut(NodeMut::Action(&mut rule.action), visitor)?;
        }
        NodeMut::QueryPattern(pattern) => {
            walk_mut(NodeMut::Ident(&mut pattern.symbol), visitor)?;
            for arg in &mut pattern.args {
                walk_mut(pattern_arg_mut(arg), visitor)?;
            }
            if let Some(capture) = &mut pattern.capture {
                walk_mut(NodeMut::Ident(capture), visitor)?;
            }
        }
        NodeMut::PatternField(field) => walk_mut(NodeMut::Ident(&mut field.name), visitor)?,
        NodeMut::Action(action) => {
            for Stmt::Call(call) in &mut action.stmts {
                walk_mut(NodeMut::Call(call), visitor)?;
            }
        }
        NodeMut::Call(call) => {
            walk_mut(NodeMut::Ident(&mut call.name), visitor)?;
            for arg in &mut call.args {
                walk_mut(expr_node_mut(arg), visitor)?;
            }
        }
        NodeMut::Dict(dict) => {
            for entry in &mut dict.entries {
                walk_mut(NodeMut::DictEntry(entry), visitor)?;
            }
        }
        NodeMut::DictEntry(entry) => {
            walk_mut(expr_node_mut(&mut entry.key), visitor)?;
            walk_mut(expr_node_mut(&mut entry.value), visitor)?;
        }
        NodeMut::Anchor(_)
        | NodeMut::Ident(_)
        | NodeMut::Int(_)
        | NodeMut::String(_)
        | NodeMut::BadExpr(_) => {}
    }
    ControlFlow::Continue(())
}

fn pattern_arg_mut(arg: &mut PatternArg) -> NodeMut<'_> {
    match arg {
        PatternArg::Pattern(pattern) => NodeMut::QueryPattern(pattern),
        PatternArg::Field(field) => NodeMut::PatternField(field),
        PatternArg::String(string) => NodeMut::String(string),
        PatternArg::Wildcard(ident) => NodeMut::Ident(ident),
        PatternArg::Anchor(anchor) => NodeMut::Anchor(anchor),
    }
}

fn expr_node_mut(expr: &mut Expr) -> NodeMut<'_> {
    match expr {
        Expr::Ident(ident) => NodeMut::Ident(ident),
        Expr::Int(int) => NodeMut::Int(int),
        Expr::String(string) => NodeMut::String(string),
        Expr::Dict(dict) => NodeMut::Dict(dict),
        Expr::Bad(bad) => NodeMut::BadExpr(bad),
    }
}
