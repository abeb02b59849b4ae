//! `TERM`, `ATOM`, and the unary/binary operator vocabulary.

use crate::ast::*;
use crate::error::ParseError;
use crate::items::NODE_PLACEHOLDER as PLACEHOLDER;
use crate::Parser;
use spl_lex::TokenKind;

impl<'a> Parser<'a> {
    /// A term has exactly three syntactic shapes: a bare atom, a
    /// parenthesized unary, or a parenthesized binary. Plain
    /// parenthesization of a lone term is not part of the grammar.
    pub(crate) fn parse_term(&mut self) -> Result<Term, ParseError> {
        if matches!(self.cur().kind, TokenKind::Ident | TokenKind::Number) {
            return Ok(Term::Atom(self.parse_atom()?));
        }

        self.eat(TokenKind::LParen)?;

        if let Some(op) = Self::unop(self.cur().kind) {
            self.advance();
            let term = Box::new(self.parse_term()?);
            self.eat(TokenKind::RParen)?;
            return Ok(Term::Unary {
                node_id: PLACEHOLDER,
                op,
                term,
            });
        }

        let lhs = Box::new(self.parse_term()?);
        let op = match Self::binop(self.cur().kind) {
            Some(op) => {
                self.advance();
                op
            }
            None => return Err(self.error_at_cur("expected binary op")),
        };
        let rhs = Box::new(self.parse_term()?);
        self.eat(TokenKind::RParen)?;
        Ok(Term::Binary {
            node_id: PLACEHOLDER,
            lhs,
            op,
            rhs,
        })
    }

    pub(crate) fn parse_atom(&mut self) -> Result<Atom, ParseError> {
        match self.cur().kind {
            TokenKind::Ident => {
                let name = self.advance().lexeme;
                Ok(Atom::VarRef {
                    node_id: PLACEHOLDER,
                    name,
                })
            }
            TokenKind::Number => {
                let tok = self.advance();
                let text = self.interner.resolve(tok.lexeme);
                let value = text
                    .parse()
                    .map_err(|_| ParseError::new(format!("number literal '{text}' out of range"), tok.line, tok.col))?;
                Ok(Atom::NumberLit {
                    node_id: PLACEHOLDER,
                    value,
                })
            }
            _ => Err(self.unexpected("an identifier or number")),
        }
    }

    fn unop(kind: TokenKind) -> Option<UnOp> {
        Some(match kind {
            TokenKind::Neg => UnOp::Neg,
            TokenKind::Not => UnOp::Not,
            _ => return None,
        })
    }

    fn binop(kind: TokenKind) -> Option<BinOp> {
        Some(match kind {
            TokenKind::Plus => BinOp::Plus,
            TokenKind::Minus => BinOp::Minus,
            TokenKind::Mult => BinOp::Mult,
            TokenKind::Div => BinOp::Div,
            TokenKind::Eq => BinOp::Eq,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Or => BinOp::Or,
            TokenKind::And => BinOp::And,
            _ => return None,
        })
    }
}
