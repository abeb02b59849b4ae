//! The scope tree: `Everywhere` → `Global | Procedure | Function | Main` →
//! per-definition `Local`.
//!
//! Rather than a single current-scope cursor climbing a uniform `parent`
//! chain, this is a fixed multi-root tree: a `Local` scope's parent is
//! always `Global`, never the `Procedure`/`Function` scope that hosts its
//! own definition's name.

use rustc_hash::FxHashMap;
use spl_par::NodeId;
use spl_util::{define_idx, Diagnostic, DiagnosticKind, Handler, Idx, IndexVec, Symbol};

define_idx!(ScopeId);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Everywhere,
    Global,
    Procedure,
    Function,
    Main,
    Local,
}

impl ScopeKind {
    fn label(self) -> &'static str {
        match self {
            ScopeKind::Everywhere => "Everywhere",
            ScopeKind::Global => "Global",
            ScopeKind::Procedure => "Procedure",
            ScopeKind::Function => "Function",
            ScopeKind::Main => "Main",
            ScopeKind::Local => "Local",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Var,
    Param,
    Proc,
    Func,
}

/// A single declared name: which scope it lives in, what kind of name it
/// is, and which AST node introduced it (used both for `DuplicateName`'s
/// "previously declared at" message and as the resolution target for uses).
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub name: Symbol,
    pub kind: EntryKind,
    pub scope_id: ScopeId,
    pub decl_node_id: NodeId,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// The owning definition's name, for `Local` scopes only — used to
    /// render a scope path like `proc p` in diagnostics.
    pub owner: Option<Symbol>,
    pub table: FxHashMap<Symbol, Entry>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, owner: Option<Symbol>) -> Self {
        Self {
            kind,
            parent,
            owner,
            table: FxHashMap::default(),
        }
    }
}

/// The scope tree built by [`crate::resolve::check_scopes`]. Base scopes
/// (`Everywhere`, `Global`, `Procedure`, `Function`, `Main`) are created
/// once by [`SymbolTable::new`]; a `Local` scope is created per
/// `ProcDef`/`FuncDef` via [`SymbolTable::new_local`].
pub struct SymbolTable {
    pub scopes: IndexVec<ScopeId, Scope>,
    pub everywhere: ScopeId,
    pub global: ScopeId,
    pub procedure: ScopeId,
    pub function: ScopeId,
    pub main: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let everywhere = scopes.push(Scope::new(ScopeKind::Everywhere, None, None));
        let global = scopes.push(Scope::new(ScopeKind::Global, Some(everywhere), None));
        let procedure = scopes.push(Scope::new(ScopeKind::Procedure, Some(everywhere), None));
        let function = scopes.push(Scope::new(ScopeKind::Function, Some(everywhere), None));
        let main = scopes.push(Scope::new(ScopeKind::Main, Some(everywhere), None));
        Self {
            scopes,
            everywhere,
            global,
            procedure,
            function,
            main,
        }
    }

    /// Creates a fresh `Local` scope for a `ProcDef`/`FuncDef` named `owner`,
    /// parented to `Global` directly — a var-use inside it never falls back
    /// through `Procedure`/`Function`.
    pub fn new_local(&mut self, owner: Symbol) -> ScopeId {
        let global = self.global;
        self.scopes.push(Scope::new(ScopeKind::Local, Some(global), Some(owner)))
    }

    /// A human-readable path for diagnostics: `Global`, `Main`, or (for a
    /// `Local` scope) the owning definition's name.
    pub fn scope_path(&self, scope_id: ScopeId, resolve_name: impl Fn(Symbol) -> String) -> String {
        let scope = &self.scopes[scope_id];
        match scope.kind {
            ScopeKind::Local => scope.owner.map(resolve_name).unwrap_or_else(|| "Local".to_string()),
            other => other.label().to_string(),
        }
    }

    /// Declares `name` in `scope_id`. Fails with `DuplicateName` if the name
    /// is already present in that scope (regardless of kind).
    pub fn declare(
        &mut self,
        scope_id: ScopeId,
        name: Symbol,
        kind: EntryKind,
        decl_node_id: NodeId,
        resolve_name: impl Fn(Symbol) -> String,
        handler: &mut Handler,
    ) {
        if let Some(prior) = self.scopes[scope_id].table.get(&name) {
            let path = self.scope_path(scope_id, resolve_name);
            handler.push(
                Diagnostic::new(
                    DiagnosticKind::DuplicateName,
                    format!(
                        "'{}' is already declared in this scope (previously at node #{})",
                        resolve_name(name),
                        prior.decl_node_id
                    ),
                )
                .with_node(decl_node_id)
                .with_scope(path),
            );
            return;
        }
        self.scopes[scope_id].table.insert(
            name,
            Entry {
                name,
                kind,
                scope_id,
                decl_node_id,
            },
        );
    }

    /// Declares a local variable in a `Local` scope. Unlike [`Self::declare`],
    /// a clash against an existing *parameter* is reported as
    /// `LocalShadowsParam` rather than the generic `DuplicateName`.
    pub fn declare_local_var(
        &mut self,
        scope_id: ScopeId,
        name: Symbol,
        decl_node_id: NodeId,
        resolve_name: impl Fn(Symbol) -> String,
        handler: &mut Handler,
    ) {
        if let Some(prior) = self.scopes[scope_id].table.get(&name) {
            if prior.kind == EntryKind::Param {
                let path = self.scope_path(scope_id, &resolve_name);
                handler.push(
                    Diagnostic::new(
                        DiagnosticKind::LocalShadowsParam,
                        format!("local '{}' shadows parameter of the same name", resolve_name(name)),
                    )
                    .with_node(decl_node_id)
                    .with_scope(path),
                );
                return;
            }
        }
        self.declare(scope_id, name, EntryKind::Var, decl_node_id, resolve_name, handler);
    }

    pub fn lookup_local(&self, scope_id: ScopeId, name: Symbol) -> Option<&Entry> {
        self.scopes[scope_id].table.get(&name)
    }

    /// Resolves `name` by checking each scope in `chain`, in order — the
    /// explicit lookup chains this language's scope rules require
    /// (`param → local → global`, `main → global`), rather than a generic
    /// parent-pointer walk, since `Local`/`Main`'s structural parent is
    /// `Everywhere`/`Global` and the lookup order does not coincide with
    /// `.parent` everywhere.
    pub fn resolve_chain(&self, chain: &[ScopeId], name: Symbol) -> Option<&Entry> {
        chain.iter().find_map(|&scope_id| self.lookup_local(scope_id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_util::Interner;

    #[test]
    fn base_scopes_parent_everywhere() {
        let symtab = SymbolTable::new();
        assert_eq!(symtab.scopes[symtab.global].parent, Some(symtab.everywhere));
        assert_eq!(symtab.scopes[symtab.main].parent, Some(symtab.everywhere));
        assert_eq!(symtab.scopes[symtab.everywhere].parent, None);
    }

    #[test]
    fn local_scope_parents_global_not_procedure() {
        let mut symtab = SymbolTable::new();
        let mut interner = Interner::new();
        let p = interner.intern("p");
        let local = symtab.new_local(p);
        assert_eq!(symtab.scopes[local].parent, Some(symtab.global));
        assert_ne!(symtab.scopes[local].parent, Some(symtab.procedure));
    }

    #[test]
    fn duplicate_declare_in_same_scope_reports_diagnostic() {
        let mut symtab = SymbolTable::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let x = interner.intern("x");
        symtab.declare(symtab.global, x, EntryKind::Var, 1, |s| interner.resolve(s).to_string(), &mut handler);
        symtab.declare(symtab.global, x, EntryKind::Var, 2, |s| interner.resolve(s).to_string(), &mut handler);
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].kind, DiagnosticKind::DuplicateName);
    }

    #[test]
    fn local_var_shadowing_param_reports_local_shadows_param() {
        let mut symtab = SymbolTable::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let p = interner.intern("p");
        let x = interner.intern("x");
        let local = symtab.new_local(p);
        symtab.declare(local, x, EntryKind::Param, 1, |s| interner.resolve(s).to_string(), &mut handler);
        symtab.declare_local_var(local, x, 2, |s| interner.resolve(s).to_string(), &mut handler);
        assert_eq!(handler.diagnostics()[0].kind, DiagnosticKind::LocalShadowsParam);
    }

    #[test]
    fn resolve_chain_checks_in_order() {
        let mut symtab = SymbolTable::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let p = interner.intern("p");
        let x = interner.intern("x");
        let local = symtab.new_local(p);
        symtab.declare(symtab.global, x, EntryKind::Var, 1, |s| interner.resolve(s).to_string(), &mut handler);
        let found = symtab.resolve_chain(&[local, symtab.global], x).unwrap();
        assert_eq!(found.scope_id, symtab.global);
    }
}
