//! Symbol — an interned identifier.
//!
//! SPL programs are small (a handful of globals, three-ish locals per
//! definition) so there is no need for a lock-free, leak-on-purpose global
//! table. A single [`Interner`] is created per compilation and threaded
//! through the lexer, parser, scope checker, and code generator; `Symbol` is a
//! cheap `Copy` handle into it.
//!
//! # Examples
//!
//! ```
//! use spl_util::symbol::Interner;
//!
//! let mut interner = Interner::new();
//! let a = interner.intern("total");
//! let b = interner.intern("total");
//! let c = interner.intern("count");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(interner.resolve(a), "total");
//! ```

use rustc_hash::FxHashMap;
use std::fmt;

/// A compact, interned handle to an identifier string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Owns the string table a [`Symbol`] indexes into.
#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, u32>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning its `Symbol`. Repeated calls with the same
    /// string return the same symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&id) = self.lookup.get(s) {
            return Symbol(id);
        }
        let id = self.strings.len() as u32;
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        Symbol(id)
    }

    /// Resolve a symbol back to its string. Panics if the symbol was not
    /// produced by this interner.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("x");
        assert_eq!(a, b);
        assert_eq!(interner.strings.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("y");
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "x");
        assert_eq!(interner.resolve(b), "y");
    }
}
