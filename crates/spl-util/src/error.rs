//! Shared error types for stages that have nothing stage-specific to say.
//!
//! Each pipeline crate (`spl-lex`, `spl-par`, `spl-gen`) defines its own
//! `thiserror` error enum for the failures unique to that stage; this module
//! only holds the couple of error shapes common to more than one of them.

use thiserror::Error;

/// An error with a fixed `line:col` position, shared by the lexer's and
/// parser's fatal (non-collected) error bands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} at {line}:{col}")]
pub struct PositionedError {
    pub message: String,
    pub line: u32,
    pub col: u32,
}

impl PositionedError {
    pub fn new(message: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            message: message.into(),
            line,
            col,
        }
    }
}
