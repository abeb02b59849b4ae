//! spl-util — core utilities shared by every stage of the SPL compiler.
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate holds the foundation types every other `spl-*` crate depends
//! on: interned identifiers ([`symbol`]), source positions ([`span`]),
//! typed-index vectors ([`index_vec`]), and diagnostic reporting
//! ([`diagnostic`]). None of it is specific to SPL's grammar or semantics —
//! it is the same kind of ambient plumbing a compiler needs regardless of
//! which language it compiles.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. NO GLOBAL STATE. A `Symbol` is only meaningful relative to the
//!    `Interner` that minted it; an `Interner` is owned by one compilation
//!    `Session` and threaded through explicitly — no shared mutable state
//!    between stages beyond what is passed forward explicitly.
//! 2. TYPE SAFETY VIA NEWTYPES. `IndexVec<I, T>` and `define_idx!` prevent
//!    mixing up index spaces, e.g. a `ScopeId` used where a raw `u32` node
//!    id was expected.
//! 3. DIAGNOSTICS AS VALUES. A [`diagnostic::Handler`] only ever collects;
//!    it never panics or aborts. Fatal errors (lexical, syntactic, codegen)
//!    are ordinary `Result` values from the stage that detected them.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticKind, Handler};
pub use error::PositionedError;
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::{Interner, Symbol};
