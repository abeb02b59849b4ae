//! Lexical errors.

use spl_util::PositionedError;
use thiserror::Error;

/// A fatal lexical error. The lexer raises the first one it finds and stops
/// — SPL has no lexical error recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(transparent)]
pub struct LexError(#[from] PositionedError);

impl LexError {
    pub fn new(message: impl Into<String>, line: u32, col: u32) -> Self {
        Self(PositionedError::new(message, line, col))
    }

    pub fn line(&self) -> u32 {
        self.0.line
    }

    pub fn col(&self) -> u32 {
        self.0.col
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }
}
