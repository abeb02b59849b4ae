//! spl-lex — turns SPL source text into a token stream.
//!
//! Recognition follows a fixed priority order: end of input, single-char
//! punctuation, string literals, number literals, then identifiers/keywords.
//! Anything else is a fatal [`error::LexError`] carrying the offending
//! character's `line:col` — SPL's lexer does not recover, matching the
//! fatal-error band the rest of the pipeline assumes.

pub mod cursor;
pub mod error;
pub mod lexer;
pub mod token;

pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};
