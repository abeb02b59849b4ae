//! Token dispatch.
//!
//! `Lexer::next` is a straight-line `match` on the cursor's current
//! character, tried in priority order: end of input, then single-character
//! punctuation, then string, number, identifier/keyword, then a catch-all
//! lexical error. SPL's alphabet is small and closed — no operators, no
//! comments, no multi-char punctuation beyond the fixed set below.

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind};
use spl_util::Interner;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Lexes the entire source into a token stream, ending with one `Eof`
    /// token. Stops at the first lexical error.
    pub fn tokenize(source: &'a str, interner: &mut Interner) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next(interner)?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    /// Produces the next token, or a `LexError` on unrecognized input.
    pub fn next(&mut self, interner: &mut Interner) -> Result<Token, LexError> {
        self.cursor.skip_whitespace();
        let line = self.cursor.line();
        let col = self.cursor.col();

        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof, "", interner, line, col));
        }

        let c = self.cursor.current();
        if let Some(kind) = Self::punctuation(c) {
            self.cursor.advance();
            let lexeme = c.to_string();
            return Ok(self.make(kind, &lexeme, interner, line, col));
        }
        if c == '"' {
            return self.lex_string(interner, line, col);
        }
        if c.is_ascii_digit() {
            return self.lex_number(interner, line, col);
        }
        if c.is_ascii_lowercase() {
            return self.lex_ident_or_keyword(interner, line, col);
        }

        Err(LexError::new(format!("Unknown character '{c}'"), line, col))
    }

    fn punctuation(c: char) -> Option<TokenKind> {
        Some(match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Assign,
            '>' => TokenKind::Gt,
            _ => return None,
        })
    }

    /// `"` [A-Za-z0-9]{0,15} `"`.
    fn lex_string(&mut self, interner: &mut Interner, line: u32, col: u32) -> Result<Token, LexError> {
        self.cursor.advance(); // opening quote
        let start = self.cursor.position();
        let mut len = 0usize;
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::new("unterminated string literal", line, col));
            }
            let c = self.cursor.current();
            if c == '"' {
                break;
            }
            if !c.is_ascii_alphanumeric() {
                return Err(LexError::new(
                    format!("invalid character '{c}' in string literal"),
                    line,
                    col,
                ));
            }
            len += 1;
            if len > 15 {
                return Err(LexError::new("string literal exceeds 15 characters", line, col));
            }
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        self.cursor.advance(); // closing quote
        Ok(self.make(TokenKind::String, &text, interner, line, col))
    }

    /// `0` or `[1-9][0-9]*`.
    fn lex_number(&mut self, interner: &mut Interner, line: u32, col: u32) -> Result<Token, LexError> {
        let start = self.cursor.position();
        let first = self.cursor.current();
        self.cursor.advance();
        if first == '0' {
            if self.cursor.current().is_ascii_digit() {
                return Err(LexError::new("leading zero in number literal", line, col));
            }
        } else {
            while self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        let text = self.cursor.slice_from(start).to_string();
        Ok(self.make(TokenKind::Number, &text, interner, line, col))
    }

    /// `[a-z][a-z0-9]*`, checked against the keyword table.
    fn lex_ident_or_keyword(
        &mut self,
        interner: &mut Interner,
        line: u32,
        col: u32,
    ) -> Result<Token, LexError> {
        let start = self.cursor.position();
        while self.cursor.current().is_ascii_lowercase() || self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Ident);
        let text = text.to_string();
        Ok(self.make(kind, &text, interner, line, col))
    }

    fn make(&self, kind: TokenKind, lexeme: &str, interner: &mut Interner, line: u32, col: u32) -> Token {
        Token::new(kind, interner.intern(lexeme), line, col)
    }
}
