//! spl-par — recursive-descent parser over the SPL token stream.
//!
//! The `Parser` holds exactly one token of lookahead beyond the current one
//! (`cur`, `nxt`), the minimum needed to disambiguate `IDENT` at the start of
//! an instruction (procedure call vs. assignment vs. function-call
//! assignment) without backtracking. Grammar productions are split across
//! [`items`] (top-level sections and definitions), [`stmt`] (algorithms and
//! instructions), and [`expr`] (terms, atoms, operators) off a shared
//! `Parser` rather than one monolithic `parse` function.
//!
//! This grammar is small enough that a single fatal error band suffices:
//! the first syntax error raised aborts parsing immediately as a `Result`,
//! with no synchronization or multi-error recovery.

pub mod ast;
pub mod error;
pub mod ids;
pub mod items;
pub mod printer;
pub mod stmt;
pub mod expr;

pub use ast::*;
pub use error::ParseError;
pub use ids::assign_ids;

use spl_lex::{Token, TokenKind};
use spl_util::Interner;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    interner: &'a Interner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], interner: &'a Interner) -> Self {
        assert!(!tokens.is_empty(), "token stream must end with Eof");
        Self { tokens, pos: 0, interner }
    }

    /// Parses a full program: `glob { .. } proc { .. } func { .. } main { .. }`.
    pub fn parse_program(tokens: &'a [Token], interner: &'a Interner) -> Result<Program, ParseError> {
        let mut parser = Parser::new(tokens, interner);
        parser.parse_program_entry()
    }

    fn cur(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn nxt(&self) -> Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    fn advance(&mut self) -> Token {
        let tok = self.cur();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Asserts `cur.kind == kind`, consumes it, and returns the consumed
    /// token. Raises a positioned syntax error on mismatch.
    fn eat(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.cur().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let tok = self.cur();
        ParseError::new(format!("expected {expected}, found {}", tok.kind), tok.line, tok.col)
    }

    fn error_at_cur(&self, message: impl Into<String>) -> ParseError {
        let tok = self.cur();
        ParseError::new(message, tok.line, tok.col)
    }
}
