//! `--dump-scopes` support: a plain-text rendering of the full scope tree,
//! entries included — a debugging aid in the same spirit as
//! `spl_par::printer`, just one level down the pipeline.

use crate::scope::SymbolTable;
use spl_util::Interner;
use std::fmt::Write;

pub fn dump_scope_tree(symtab: &SymbolTable, interner: &Interner) -> String {
    let mut out = String::new();
    for (id, scope) in symtab.scopes.iter_enumerated() {
        let owner = scope.owner.map(|o| format!(" ({})", interner.resolve(o))).unwrap_or_default();
        let parent = scope.parent.map(|p| p.0.to_string()).unwrap_or_else(|| "-".to_string());
        writeln!(out, "Scope #{} {:?}{owner} parent=#{parent}", id.0, scope.kind).unwrap();
        let mut entries: Vec<_> = scope.table.values().collect();
        entries.sort_by_key(|e| e.decl_node_id);
        for entry in entries {
            writeln!(out, "  {} : {:?} (node #{})", interner.resolve(entry.name), entry.kind, entry.decl_node_id).unwrap();
        }
    }
    out
}
