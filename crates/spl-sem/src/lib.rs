//! spl-sem — static semantic analysis: scope checking then type checking.
//!
//! Both passes accumulate [`spl_util::Diagnostic`]s into a caller-owned
//! [`spl_util::Handler`] rather than returning on the first problem, so a
//! single run reports everything wrong with a program (see the
//! error-handling design's two-band split: lexing/parsing is fatal,
//! scope/type checking is collected). The driver runs [`check_scopes`] to
//! completion, inspects the handler, and only proceeds to [`check_types`] if
//! it is still clean — repeating once more before codegen.
//!
//! [`scope`] builds the fixed scope tree and declares every name;
//! [`resolve`] resolves every use against it; [`types`] assigns a type to
//! every term using the resolution it produced. Resolution info is never
//! written back onto the AST — see `spl_par::ast`'s module doc — so both
//! passes hand the driver side tables keyed by `node_id` instead.

pub mod dump;
pub mod resolve;
pub mod scope;
pub mod types;

pub use dump::dump_scope_tree;
pub use resolve::{check_scopes, Resolution};
pub use scope::{Entry, EntryKind, Scope, ScopeId, ScopeKind, SymbolTable};
pub use types::{check_types, TypeKind, TypeMap};
