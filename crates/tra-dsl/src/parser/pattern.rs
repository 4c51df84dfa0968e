//! Rules and their structural patterns.

use super::{PResult, Parser};
use crate::ast::{Anchor, PatternAction, PatternArg, PatternField, QueryPattern};
use crate::token::TokenKind;

impl Parser {
    pub(super) fn parse_pattern_action(&mut self) -> PResult<PatternAction> {
        let pattern = self.parse_pattern()?;
        let action = self.parse_action()?;
        Ok(PatternAction { pattern, action })
    }

    fn parse_pattern(&mut self) -> PResult<QueryPattern> {
        let lparen = self.expect(TokenKind::LParen)?.pos;
        let symbol = self.parse_ident()?;
        let mut args = Vec::new();
        loop {
            let token = self.peek().clone();
            let arg = match token.kind {
                TokenKind::RParen => break,
                TokenKind::LParen => PatternArg::Pattern(self.parse_pattern()?),
                TokenKind::String => PatternArg::String(self.parse_string()?),
                TokenKind::Period => {
                    self.bump();
                    PatternArg::Anchor(Anchor { pos: token.pos })
                }
                TokenKind::Ident if self.peek_second() == TokenKind::Colon => {
                    let name = self.parse_ident()?;
                    let colon = self.expect(TokenKind::Colon)?.pos;
                    PatternArg::Field(PatternField { name, colon })
                }
                TokenKind::Ident if !token.lit.starts_with('@') => {
                    PatternArg::Wildcard(self.parse_ident()?)
                }
                kind => {
                    return Err(self.bail(token.pos, format!("bad token in node pattern: {kind}")));
                }
            };
            args.push(arg);
        }
        let rparen = self.expect(TokenKind::RParen)?.pos;
        let next = self.peek();
        let capture = if next.kind == TokenKind::Ident && next.lit.starts_with('@') {
            Some(self.parse_ident()?)
        } else {
            None
        };
        Ok(QueryPattern {
            lparen,
            symbol,
            args,
            rparen,
            capture,
        })
    }
}
