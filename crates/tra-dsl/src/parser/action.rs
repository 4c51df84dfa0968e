//! Action blocks, statements and expressions.

use super::{Bailout, PResult, Parser};
use crate::ast::{Action, BadExpr, Call, Dict, DictEntry, Expr, IntLit, Stmt};
use crate::position::Span;
use crate::token::TokenKind;

/// Tokens at which recovery inside a dict stops skipping.
const DICT_SYNC: &[TokenKind] = &[
    TokenKind::Eof,
    TokenKind::Semicolon,
    TokenKind::RParen,
    TokenKind::RCurlyBracket,
    TokenKind::Comma,
];

const fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident | TokenKind::Int | TokenKind::String | TokenKind::LCurlyBracket
    )
}

impl Parser {
    pub(super) fn parse_action(&mut self) -> PResult<Action> {
        let lbrace = self.expect(TokenKind::LCurlyBracket)?.pos;
        let mut stmts = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RCurlyBracket | TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.bump();
                }
                _ => stmts.push(self.parse_stmt()?),
            }
        }
        let rbrace = self.expect(TokenKind::RCurlyBracket)?.pos;
        Ok(Action {
            lbrace,
            stmts,
            rbrace,
        })
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        let token = self.peek().clone();
        if token.kind != TokenKind::Ident {
            return Err(self.bail(
                token.pos,
                format!("unexpected token {token}, wanted statement"),
            ));
        }
        self.parse_call().map(Stmt::Call)
    }

    fn parse_call(&mut self) -> PResult<Call> {
        let name = self.parse_ident()?;
        let lparen = self.expect(TokenKind::LParen)?.pos;
        let mut args = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RParen
                | TokenKind::RCurlyBracket
                | TokenKind::Semicolon
                | TokenKind::Eof => break,
                TokenKind::Comma if !args.is_empty() => {
                    self.bump();
                }
                _ => args.push(self.parse_expr()?),
            }
        }
        let rparen = self.expect(TokenKind::RParen)?.pos;
        Ok(Call {
            name,
            lparen,
            args,
            rparen,
        })
    }

    fn parse_expr(&mut self) -> PResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident => self.parse_ident().map(Expr::Ident),
            TokenKind::String => self.parse_string().map(Expr::String),
            TokenKind::Int => Ok(self.parse_int()),
            TokenKind::LCurlyBracket => Ok(self.parse_dict()),
            _ => Err(self.bail(
                token.pos,
                format!("unexpected token {token}, wanted expression"),
            )),
        }
    }

    fn parse_int(&mut self) -> Expr {
        let token = self.bump();
        if let Ok(value) = token.lit.parse::<i64>() {
            return Expr::Int(IntLit {
                pos: token.pos,
                raw: token.lit,
                value,
            });
        }
        let span = token.span();
        self.error(
            token.pos,
            format!("integer literal {} out of range", token.lit),
        );
        Expr::Bad(BadExpr { span })
    }

    /// Parses a dict literal. Errors inside the braces are recovered here, so
    /// this never bails out; a dict cut short becomes a [`BadExpr`].
    fn parse_dict(&mut self) -> Expr {
        let lbrace = self.bump().pos;
        let mut entries = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::RCurlyBracket => break,
                TokenKind::Eof | TokenKind::RParen | TokenKind::Semicolon => {
                    let start = self.file.position(lbrace);
                    self.error(
                        token.pos,
                        format!("expected '}}', unterminated dict starting at {start}"),
                    );
                    return Expr::Bad(BadExpr {
                        span: Span::new(lbrace, token.pos),
                    });
                }
                TokenKind::Comma => {
                    self.error(token.pos, format!("expected entry, got {}", token.kind));
                    self.bump();
                }
                kind if !starts_expression(kind) => {
                    self.error(token.pos, format!("expected entry, got {kind}"));
                    let end = self.skip_to(DICT_SYNC);
                    entries.push(DictEntry {
                        key: Expr::Bad(BadExpr {
                            span: Span::new(token.pos, end),
                        }),
                        colon: None,
                        value: Expr::Bad(BadExpr { span: Span::at(end) }),
                        comma: self.eat(TokenKind::Comma),
                    });
                }
                _ => {
                    let entry = self.parse_dict_entry();
                    entries.push(entry);
                }
            }
        }
        let rbrace = self.bump().pos;
        Expr::Dict(Dict {
            lbrace,
            entries,
            rbrace,
        })
    }

    fn parse_dict_entry(&mut self) -> DictEntry {
        let key = self.parse_expr_or_skip();
        let next = self.peek().clone();
        if next.kind != TokenKind::Colon {
            self.error(
                next.pos,
                format!("expected {}, got {next}", TokenKind::Colon),
            );
            let end = self.skip_to(DICT_SYNC);
            return DictEntry {
                key,
                colon: None,
                value: Expr::Bad(BadExpr { span: Span::at(end) }),
                comma: self.eat(TokenKind::Comma),
            };
        }
        let colon = Some(self.bump().pos);
        let value = self.parse_expr_or_skip();
        DictEntry {
            key,
            colon,
            value,
            comma: self.eat(TokenKind::Comma),
        }
    }

    fn parse_expr_or_skip(&mut self) -> Expr {
        let start = self.peek().pos;
        match self.parse_expr() {
            Ok(expr) => expr,
            Err(Bailout) => {
                let end = self.skip_to(DICT_SYNC);
                Expr::Bad(BadExpr {
                    span: Span::new(start, end),
                })
            }
        }
    }
}
