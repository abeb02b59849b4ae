//! Phases A–C: building the scope tree, declaring every name, and
//! resolving every use.
//!
//! A "collect items" declaration pass followed by a walk that resolves
//! uses, collapsed to the fixed three phases this language's fixed scope
//! shape allows (no nested blocks, no shadowing beyond the single `Local`
//! level).

use rustc_hash::FxHashMap;
use spl_par::ast::*;
use spl_util::{Diagnostic, DiagnosticKind, Handler, Interner, Symbol};

use crate::scope::{Entry, EntryKind, ScopeId, SymbolTable};

/// The result of scope checking: the scope tree plus two resolution maps
/// keyed by `node_id` (kept as side tables rather than writing back into
/// the AST — see `spl_par::ast`'s module doc for why).
pub struct Resolution {
    pub symtab: SymbolTable,
    /// `VarRef` node id → the entry it resolved to. Also carries the
    /// resolution of an `Assign`'s target, keyed by the `Assign` node's own
    /// id (targets are bare `Symbol`s, not `Atom` nodes, so they have no
    /// id of their own to key on).
    pub var_resolved: FxHashMap<NodeId, Entry>,
    /// `Call`/`AssignRhs::Call` node id → the proc/func entry it resolved to.
    pub call_resolved: FxHashMap<NodeId, Entry>,
}

impl Resolution {
    pub fn var_entry(&self, node_id: NodeId) -> Option<&Entry> {
        self.var_resolved.get(&node_id)
    }

    pub fn call_entry(&self, node_id: NodeId) -> Option<&Entry> {
        self.call_resolved.get(&node_id)
    }
}

pub fn check_scopes(program: &Program, interner: &Interner, handler: &mut Handler) -> Resolution {
    let mut symtab = SymbolTable::new();
    let mut proc_locals: FxHashMap<Symbol, ScopeId> = FxHashMap::default();
    let mut func_locals: FxHashMap<Symbol, ScopeId> = FxHashMap::default();
    let resolve_name = |s: Symbol| -> String { interner.resolve(s).to_string() };

    declare_globals(program, &mut symtab, &resolve_name, handler);
    declare_procs(program, &mut symtab, &mut proc_locals, &resolve_name, handler);
    declare_funcs(program, &mut symtab, &mut func_locals, &resolve_name, handler);
    declare_main_vars(program, &mut symtab, &resolve_name, handler);

    check_cross_category(&symtab, &resolve_name, handler);

    let arity = build_arity(program);

    let mut var_resolved = FxHashMap::default();
    let mut call_resolved = FxHashMap::default();

    for proc in &program.procs {
        let local = proc_locals[&proc.name];
        let chain = [local, symtab.global];
        resolve_algo(&proc.body.algo, &symtab, &chain, &arity, &resolve_name, &mut var_resolved, &mut call_resolved, handler);
    }
    for func in &program.funcs {
        let local = func_locals[&func.name];
        let chain = [local, symtab.global];
        resolve_algo(&func.body.algo, &symtab, &chain, &arity, &resolve_name, &mut var_resolved, &mut call_resolved, handler);
        resolve_atom(&func.ret, &symtab, &chain, &resolve_name, &mut var_resolved, handler, "Function");
    }
    let chain = [symtab.main, symtab.global];
    resolve_algo(&program.main.algo, &symtab, &chain, &arity, &resolve_name, &mut var_resolved, &mut call_resolved, handler);

    Resolution {
        symtab,
        var_resolved,
        call_resolved,
    }
}

fn declare_globals(program: &Program, symtab: &mut SymbolTable, resolve_name: &impl Fn(Symbol) -> String, handler: &mut Handler) {
    let global = symtab.global;
    for &name in &program.globals {
        symtab.declare(global, name, EntryKind::Var, program.node_id, resolve_name, handler);
    }
}

fn declare_procs(
    program: &Program,
    symtab: &mut SymbolTable,
    proc_locals: &mut FxHashMap<Symbol, ScopeId>,
    resolve_name: &impl Fn(Symbol) -> String,
    handler: &mut Handler,
) {
    let procedure = symtab.procedure;
    for proc in &program.procs {
        symtab.declare(procedure, proc.name, EntryKind::Proc, proc.node_id, resolve_name, handler);
        let local = symtab.new_local(proc.name);
        for &param in &proc.params {
            symtab.declare(local, param, EntryKind::Param, proc.node_id, resolve_name, handler);
        }
        for &var in &proc.body.locals {
            symtab.declare_local_var(local, var, proc.body.node_id, resolve_name, handler);
        }
        proc_locals.insert(proc.name, local);
    }
}

fn declare_funcs(
    program: &Program,
    symtab: &mut SymbolTable,
    func_locals: &mut FxHashMap<Symbol, ScopeId>,
    resolve_name: &impl Fn(Symbol) -> String,
    handler: &mut Handler,
) {
    let function = symtab.function;
    for func in &program.funcs {
        symtab.declare(function, func.name, EntryKind::Func, func.node_id, resolve_name, handler);
        let local = symtab.new_local(func.name);
        for &param in &func.params {
            symtab.declare(local, param, EntryKind::Param, func.node_id, resolve_name, handler);
        }
        for &var in &func.body.locals {
            symtab.declare_local_var(local, var, func.body.node_id, resolve_name, handler);
        }
        func_locals.insert(func.name, local);
    }
}

fn declare_main_vars(program: &Program, symtab: &mut SymbolTable, resolve_name: &impl Fn(Symbol) -> String, handler: &mut Handler) {
    let main = symtab.main;
    for &var in &program.main.variables {
        symtab.declare(main, var, EntryKind::Var, program.main.node_id, resolve_name, handler);
    }
}

/// Declared parameter count for every procedure and function name. Proc and
/// func names never collide with each other (`check_cross_category` rejects
/// that), so one map can hold both.
fn build_arity(program: &Program) -> FxHashMap<Symbol, usize> {
    let mut arity = FxHashMap::default();
    for proc in &program.procs {
        arity.insert(proc.name, proc.params.len());
    }
    for func in &program.funcs {
        arity.insert(func.name, func.params.len());
    }
    arity
}

/// No variable name (global or main-local) may equal a procedure or
/// function name; no procedure name may equal a function name.
fn check_cross_category(symtab: &SymbolTable, resolve_name: &impl Fn(Symbol) -> String, handler: &mut Handler) {
    let mut vars: FxHashMap<Symbol, Entry> = FxHashMap::default();
    for (&name, entry) in &symtab.scopes[symtab.global].table {
        vars.insert(name, *entry);
    }
    for (&name, entry) in &symtab.scopes[symtab.main].table {
        vars.entry(name).or_insert(*entry);
    }

    for (&name, proc_entry) in &symtab.scopes[symtab.procedure].table {
        if let Some(var_entry) = vars.get(&name) {
            emit_cross_category(name, proc_entry.decl_node_id.max(var_entry.decl_node_id), resolve_name, handler);
        }
    }
    for (&name, func_entry) in &symtab.scopes[symtab.function].table {
        if let Some(var_entry) = vars.get(&name) {
            emit_cross_category(name, func_entry.decl_node_id.max(var_entry.decl_node_id), resolve_name, handler);
        }
        if let Some(proc_entry) = symtab.scopes[symtab.procedure].table.get(&name) {
            emit_cross_category(name, func_entry.decl_node_id.max(proc_entry.decl_node_id), resolve_name, handler);
        }
    }
}

fn emit_cross_category(name: Symbol, node_id: NodeId, resolve_name: &impl Fn(Symbol) -> String, handler: &mut Handler) {
    handler.push(
        Diagnostic::new(
            DiagnosticKind::CrossCategoryClash,
            format!("'{}' is reused across variable/procedure/function naming", resolve_name(name)),
        )
        .with_node(node_id)
        .with_scope("Everywhere"),
    );
}

#[allow(clippy::too_many_arguments)]
fn resolve_algo(
    algo: &Algo,
    symtab: &SymbolTable,
    chain: &[ScopeId; 2],
    arity: &FxHashMap<Symbol, usize>,
    resolve_name: &impl Fn(Symbol) -> String,
    var_resolved: &mut FxHashMap<NodeId, Entry>,
    call_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
) {
    for instr in &algo.instrs {
        resolve_instr(instr, symtab, chain, arity, resolve_name, var_resolved, call_resolved, handler);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_instr(
    instr: &Instr,
    symtab: &SymbolTable,
    chain: &[ScopeId; 2],
    arity: &FxHashMap<Symbol, usize>,
    resolve_name: &impl Fn(Symbol) -> String,
    var_resolved: &mut FxHashMap<NodeId, Entry>,
    call_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
) {
    let scope_label = || symtab.scope_path(chain[0], resolve_name);
    match instr {
        Instr::Halt { .. } => {}
        Instr::Print { output, .. } => resolve_output(output, symtab, chain, resolve_name, var_resolved, handler),
        Instr::Call { node_id, name, args } => {
            resolve_call_target(
                *node_id, *name, symtab.procedure, "procedure", args.len(), symtab, arity, resolve_name, call_resolved, handler, &scope_label,
            );
            for arg in args {
                resolve_atom_inner(arg, symtab, chain, resolve_name, var_resolved, handler, &scope_label);
            }
        }
        Instr::Assign(assign) => {
            match symtab.resolve_chain(chain, assign.target) {
                Some(entry) => {
                    var_resolved.insert(assign.node_id, *entry);
                }
                None => {
                    handler.push(
                        Diagnostic::new(
                            DiagnosticKind::UndeclaredVariable,
                            format!("'{}' is not declared", resolve_name(assign.target)),
                        )
                        .with_node(assign.node_id)
                        .with_scope(scope_label()),
                    );
                }
            }
            match &assign.rhs {
                AssignRhs::Call { name, args } => {
                    resolve_call_target(
                        assign.node_id, *name, symtab.function, "function", args.len(), symtab, arity, resolve_name, call_resolved, handler,
                        &scope_label,
                    );
                    for arg in args {
                        resolve_atom_inner(arg, symtab, chain, resolve_name, var_resolved, handler, &scope_label);
                    }
                }
                AssignRhs::Term(term) => resolve_term(term, symtab, chain, resolve_name, var_resolved, handler, &scope_label),
            }
        }
        Instr::LoopWhile(l) => {
            resolve_term(&l.cond, symtab, chain, resolve_name, var_resolved, handler, &scope_label);
            resolve_algo(&l.body, symtab, chain, arity, resolve_name, var_resolved, call_resolved, handler);
        }
        Instr::LoopDoUntil(l) => {
            resolve_algo(&l.body, symtab, chain, arity, resolve_name, var_resolved, call_resolved, handler);
            resolve_term(&l.cond, symtab, chain, resolve_name, var_resolved, handler, &scope_label);
        }
        Instr::BranchIf(b) => {
            resolve_term(&b.cond, symtab, chain, resolve_name, var_resolved, handler, &scope_label);
            resolve_algo(&b.then_branch, symtab, chain, arity, resolve_name, var_resolved, call_resolved, handler);
            if let Some(else_branch) = &b.else_branch {
                resolve_algo(else_branch, symtab, chain, arity, resolve_name, var_resolved, call_resolved, handler);
            }
        }
    }
}

/// Resolves a call's target name in `scope_id` (the flat `Procedure` or
/// `Function` namespace) and, once resolved, checks `arg_count` against its
/// declared parameter count — a mismatch is reported right here rather than
/// left for codegen's call-inlining to silently zip to the shorter list.
#[allow(clippy::too_many_arguments)]
fn resolve_call_target(
    node_id: NodeId,
    name: Symbol,
    scope_id: ScopeId,
    noun: &str,
    arg_count: usize,
    symtab: &SymbolTable,
    arity: &FxHashMap<Symbol, usize>,
    resolve_name: &impl Fn(Symbol) -> String,
    call_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
    scope_label: &impl Fn() -> String,
) {
    match symtab.lookup_local(scope_id, name) {
        Some(entry) => {
            call_resolved.insert(node_id, *entry);
            if let Some(&expected) = arity.get(&name) {
                if expected != arg_count {
                    handler.push(
                        Diagnostic::new(
                            DiagnosticKind::ArityMismatch,
                            format!(
                                "'{}' expects {} argument{}, found {}",
                                resolve_name(name),
                                expected,
                                if expected == 1 { "" } else { "s" },
                                arg_count
                            ),
                        )
                        .with_node(node_id)
                        .with_scope(scope_label()),
                    );
                }
            }
        }
        None => {
            handler.push(
                Diagnostic::new(
                    DiagnosticKind::UndeclaredVariable,
                    format!("'{}' is not a declared {}", resolve_name(name), noun),
                )
                .with_node(node_id)
                .with_scope(scope_label()),
            );
        }
    }
}

fn resolve_output(
    output: &Output,
    symtab: &SymbolTable,
    chain: &[ScopeId; 2],
    resolve_name: &impl Fn(Symbol) -> String,
    var_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
) {
    let scope_label = || symtab.scope_path(chain[0], resolve_name);
    match output {
        Output::Atom(atom) => resolve_atom_inner(atom, symtab, chain, resolve_name, var_resolved, handler, &scope_label),
        Output::StringLit { .. } => {}
    }
}

fn resolve_term(
    term: &Term,
    symtab: &SymbolTable,
    chain: &[ScopeId; 2],
    resolve_name: &impl Fn(Symbol) -> String,
    var_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
    scope_label: &impl Fn() -> String,
) {
    match term {
        Term::Atom(atom) => resolve_atom_inner(atom, symtab, chain, resolve_name, var_resolved, handler, scope_label),
        Term::Unary { term, .. } => resolve_term(term, symtab, chain, resolve_name, var_resolved, handler, scope_label),
        Term::Binary { lhs, rhs, .. } => {
            resolve_term(lhs, symtab, chain, resolve_name, var_resolved, handler, scope_label);
            resolve_term(rhs, symtab, chain, resolve_name, var_resolved, handler, scope_label);
        }
    }
}

fn resolve_atom(
    atom: &Atom,
    symtab: &SymbolTable,
    chain: &[ScopeId; 2],
    resolve_name: &impl Fn(Symbol) -> String,
    var_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
    context: &str,
) {
    let scope_label = || context.to_string();
    resolve_atom_inner(atom, symtab, chain, resolve_name, var_resolved, handler, &scope_label);
}

fn resolve_atom_inner(
    atom: &Atom,
    symtab: &SymbolTable,
    chain: &[ScopeId; 2],
    resolve_name: &impl Fn(Symbol) -> String,
    var_resolved: &mut FxHashMap<NodeId, Entry>,
    handler: &mut Handler,
    scope_label: &impl Fn() -> String,
) {
    if let Atom::VarRef { node_id, name } = atom {
        match symtab.resolve_chain(chain, *name) {
            Some(entry) => {
                var_resolved.insert(*node_id, *entry);
            }
            None => {
                handler.push(
                    Diagnostic::new(DiagnosticKind::UndeclaredVariable, format!("'{}' is not declared", resolve_name(*name)))
                        .with_node(*node_id)
                        .with_scope(scope_label()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_lex::Lexer;
    use spl_par::{assign_ids, Parser};
    use spl_util::DiagnosticKind;

    fn parse(src: &str) -> (Program, Interner) {
        let mut interner = Interner::new();
        let tokens = Lexer::tokenize(src, &mut interner).unwrap();
        let mut program = Parser::parse_program(&tokens, &interner).unwrap();
        assign_ids(&mut program);
        (program, interner)
    }

    #[test]
    fn undeclared_variable_in_main_is_reported() {
        let (program, interner) = parse("glob { } proc { } func { } main { var { a } print b; halt }");
        let mut handler = Handler::new();
        let resolution = check_scopes(&program, &interner, &mut handler);
        assert!(handler.has_errors());
        assert_eq!(handler.diagnostics()[0].kind, DiagnosticKind::UndeclaredVariable);
        let _ = resolution;
    }

    #[test]
    fn declared_variable_resolves() {
        let (program, interner) = parse("glob { } proc { } func { } main { var { a } print a; halt }");
        let mut handler = Handler::new();
        let resolution = check_scopes(&program, &interner, &mut handler);
        assert!(!handler.has_errors());
        let Instr::Print { output, .. } = &program.main.algo.instrs[0] else { panic!() };
        let Output::Atom(Atom::VarRef { node_id, .. }) = output else { panic!() };
        assert!(resolution.var_entry(*node_id).is_some());
    }

    #[test]
    fn param_shadowed_by_local_is_reported() {
        let (program, interner) = parse(
            "glob { } proc { p(x) { local { x } halt } } func { } main { var { } halt }",
        );
        let mut handler = Handler::new();
        let _ = check_scopes(&program, &interner, &mut handler);
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::LocalShadowsParam));
    }

    #[test]
    fn function_name_clashing_global_is_cross_category() {
        let (program, interner) = parse(
            "glob { foo } proc { } func { foo() { local { } halt; return 0 } } main { var { } halt }",
        );
        let mut handler = Handler::new();
        let _ = check_scopes(&program, &interner, &mut handler);
        let clashes: Vec<_> = handler.diagnostics().iter().filter(|d| d.kind == DiagnosticKind::CrossCategoryClash).collect();
        assert_eq!(clashes.len(), 1);
    }

    #[test]
    fn assign_target_resolves_to_the_local_not_the_global() {
        let (program, interner) = parse(
            "glob { x } proc { p() { local { x } x = 1; halt } } func { } main { var { } p(); halt }",
        );
        let mut handler = Handler::new();
        let resolution = check_scopes(&program, &interner, &mut handler);
        assert!(!handler.has_errors());
        let Instr::Assign(assign) = &program.procs[0].body.algo.instrs[0] else { panic!() };
        let entry = resolution.var_entry(assign.node_id).expect("assign target should resolve");
        assert_ne!(entry.scope_id, resolution.symtab.global);
    }

    #[test]
    fn assignment_to_undeclared_target_is_reported() {
        let (program, interner) = parse("glob { } proc { } func { } main { var { } y = 1; halt }");
        let mut handler = Handler::new();
        let _ = check_scopes(&program, &interner, &mut handler);
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::UndeclaredVariable));
    }

    #[test]
    fn procedure_call_with_too_few_arguments_is_an_arity_mismatch() {
        let (program, interner) = parse(
            "glob { } proc { bump(x y) { local { } halt } } func { } main { var { a } a = 1; bump(a); halt }",
        );
        let mut handler = Handler::new();
        let _ = check_scopes(&program, &interner, &mut handler);
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::ArityMismatch));
    }

    #[test]
    fn function_call_with_too_many_arguments_is_an_arity_mismatch() {
        let (program, interner) = parse(
            "glob { } proc { } func { sq(n) { local { } halt; return n } } main { var { r } r = sq(1 2); halt }",
        );
        let mut handler = Handler::new();
        let _ = check_scopes(&program, &interner, &mut handler);
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::ArityMismatch));
    }

    #[test]
    fn call_with_matching_arity_is_not_reported() {
        let (program, interner) = parse(
            "glob { } proc { bump(x) { local { } halt } } func { } main { var { a } a = 1; bump(a); halt }",
        );
        let mut handler = Handler::new();
        let _ = check_scopes(&program, &interner, &mut handler);
        assert!(!handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::ArityMismatch));
    }
}
