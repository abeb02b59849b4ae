//! Fatal codegen/emitter errors — unlike scope/type checking, this stage
//! does not accumulate diagnostics: a problem here is an internal-invariant
//! violation on well-typed input (see the error-handling design), so the
//! first one found aborts the pass.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A call site's callee is already on the inlining stack.
    #[error("recursive inlining detected: {chain}")]
    RecursiveInline { chain: String },

    /// A `GOTO`/`IF … THEN` target names a label no `REM` line ever defined.
    #[error("unresolved label '{0}'")]
    UnresolvedLabel(String),

    /// Two `REM` lines in the intermediate listing share a label.
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    /// A condition or term shape reached codegen that type checking should
    /// have already rejected — reachable only on a compiler bug.
    #[error("internal codegen error: {0}")]
    Internal(String),
}
