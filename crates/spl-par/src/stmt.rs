//! `ALGO`, `INSTR`, and the statement-level productions built from them.

use crate::ast::*;
use crate::error::ParseError;
use crate::items::NODE_PLACEHOLDER as PLACEHOLDER;
use crate::Parser;
use spl_lex::TokenKind;

/// Tokens that can legally open an `INSTR`. Used by the `ALGO` guard to
/// decide whether a `;` separates two instructions or terminates the list.
fn starts_instr(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Halt | TokenKind::Print | TokenKind::If | TokenKind::While | TokenKind::Do | TokenKind::Ident
    )
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_algo(&mut self) -> Result<Algo, ParseError> {
        let mut instrs = vec![self.parse_instr()?];
        while self.cur().kind == TokenKind::Semicolon && starts_instr(self.nxt().kind) {
            self.advance(); // consume ';'
            instrs.push(self.parse_instr()?);
        }
        Ok(Algo {
            node_id: PLACEHOLDER,
            instrs,
        })
    }

    fn parse_instr(&mut self) -> Result<Instr, ParseError> {
        match self.cur().kind {
            TokenKind::Halt => {
                self.advance();
                Ok(Instr::Halt { node_id: PLACEHOLDER })
            }
            TokenKind::Print => {
                self.advance();
                let output = self.parse_output()?;
                Ok(Instr::Print {
                    node_id: PLACEHOLDER,
                    output,
                })
            }
            TokenKind::If => self.parse_branch_if(),
            TokenKind::While => self.parse_loop_while(),
            TokenKind::Do => self.parse_loop_do_until(),
            TokenKind::Ident => self.parse_ident_led_instr(),
            _ => Err(self.unexpected("an instruction (halt, print, if, while, do, or identifier)")),
        }
    }

    /// The tri-way disambiguation on an `IDENT`-led instruction: a bare
    /// procedure call, a plain assignment, or a function-call assignment —
    /// decided by `nxt` and, for assignments, one token further still.
    fn parse_ident_led_instr(&mut self) -> Result<Instr, ParseError> {
        if self.nxt().kind == TokenKind::LParen {
            let name = self.advance().lexeme;
            self.eat(TokenKind::LParen)?;
            let args = self.parse_ident_list_max3_atoms()?;
            self.eat(TokenKind::RParen)?;
            return Ok(Instr::Call {
                node_id: PLACEHOLDER,
                name,
                args,
            });
        }

        let target = self.eat(TokenKind::Ident)?.lexeme;
        self.eat(TokenKind::Assign)?;

        let rhs = if self.cur().kind == TokenKind::Ident && self.nxt().kind == TokenKind::LParen {
            let name = self.advance().lexeme;
            self.eat(TokenKind::LParen)?;
            let args = self.parse_ident_list_max3_atoms()?;
            self.eat(TokenKind::RParen)?;
            AssignRhs::Call { name, args }
        } else {
            AssignRhs::Term(self.parse_term()?)
        };

        Ok(Instr::Assign(Assign {
            node_id: PLACEHOLDER,
            target,
            rhs,
        }))
    }

    /// Call-argument lists: zero to three atoms, no separators — mirrors
    /// `MAXTHREE` for parameter/local lists.
    fn parse_ident_list_max3_atoms(&mut self) -> Result<Vec<Atom>, ParseError> {
        let mut args = Vec::new();
        while matches!(self.cur().kind, TokenKind::Ident | TokenKind::Number) {
            if args.len() == 3 {
                return Err(self.unexpected("')'"));
            }
            args.push(self.parse_atom()?);
        }
        Ok(args)
    }

    fn parse_loop_while(&mut self) -> Result<Instr, ParseError> {
        self.eat(TokenKind::While)?;
        let cond = self.parse_term()?;
        self.eat(TokenKind::LBrace)?;
        let body = self.parse_algo()?;
        self.eat(TokenKind::RBrace)?;
        Ok(Instr::LoopWhile(LoopWhile {
            node_id: PLACEHOLDER,
            cond,
            body,
        }))
    }

    fn parse_loop_do_until(&mut self) -> Result<Instr, ParseError> {
        self.eat(TokenKind::Do)?;
        self.eat(TokenKind::LBrace)?;
        let body = self.parse_algo()?;
        self.eat(TokenKind::RBrace)?;
        self.eat(TokenKind::Until)?;
        let cond = self.parse_term()?;
        Ok(Instr::LoopDoUntil(LoopDoUntil {
            node_id: PLACEHOLDER,
            body,
            cond,
        }))
    }

    fn parse_branch_if(&mut self) -> Result<Instr, ParseError> {
        self.eat(TokenKind::If)?;
        let cond = self.parse_term()?;
        self.eat(TokenKind::LBrace)?;
        let then_branch = self.parse_algo()?;
        self.eat(TokenKind::RBrace)?;
        let else_branch = if self.cur().kind == TokenKind::Else {
            self.advance();
            self.eat(TokenKind::LBrace)?;
            let algo = self.parse_algo()?;
            self.eat(TokenKind::RBrace)?;
            Some(algo)
        } else {
            None
        };
        Ok(Instr::BranchIf(BranchIf {
            node_id: PLACEHOLDER,
            cond,
            then_branch,
            else_branch,
        }))
    }

    fn parse_output(&mut self) -> Result<Output, ParseError> {
        if self.cur().kind == TokenKind::String {
            let text = self.advance().lexeme;
            Ok(Output::StringLit {
                node_id: PLACEHOLDER,
                text,
            })
        } else {
            Ok(Output::Atom(self.parse_atom()?))
        }
    }
}
