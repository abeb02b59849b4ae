//! The type checker: assigns a [`TypeKind`] to every term node and
//! validates assignments, conditions, and calls against a fixed
//! operator-typing table.
//!
//! SPL's type system has no inference to speak of — every construct's type
//! is determined purely by its own shape and its operands' types, with no
//! unification over metavariables needed. This is a single post-order walk
//! with no constraint queue: the operator-typing table itself is the
//! algorithm.

use rustc_hash::FxHashMap;
use spl_par::ast::*;
use spl_util::{Diagnostic, DiagnosticKind, Handler, Interner, Symbol};

use crate::resolve::Resolution;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Numeric,
    Boolean,
    String,
    Void,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TypeKind::Numeric => "Numeric",
            TypeKind::Boolean => "Boolean",
            TypeKind::String => "String",
            TypeKind::Void => "Void",
        };
        write!(f, "{s}")
    }
}

/// `node_id → TypeKind`, populated once per term/atom/output node during
/// [`check_types`]'s single walk.
#[derive(Default)]
pub struct TypeMap {
    types: FxHashMap<NodeId, TypeKind>,
}

impl TypeMap {
    pub fn get(&self, node_id: NodeId) -> Option<TypeKind> {
        self.types.get(&node_id).copied()
    }

    fn set(&mut self, node_id: NodeId, ty: TypeKind) {
        self.types.insert(node_id, ty);
    }
}

pub fn check_types(program: &Program, resolution: &Resolution, interner: &Interner, handler: &mut Handler) -> TypeMap {
    let mut map = TypeMap::default();
    let resolve_name = |s: Symbol| -> String { interner.resolve(s).to_string() };

    for proc in &program.procs {
        check_algo(&proc.body.algo, &mut map, handler, &resolve_name);
    }
    for func in &program.funcs {
        check_algo(&func.body.algo, &mut map, handler, &resolve_name);
        // The ret atom is always a VarRef/NumberLit, which type as Numeric
        // by construction — still walked so every node gets a map entry.
        type_atom(&func.ret, &mut map);
    }
    check_algo(&program.main.algo, &mut map, handler, &resolve_name);

    map
}

fn check_algo(algo: &Algo, map: &mut TypeMap, handler: &mut Handler, resolve_name: &impl Fn(Symbol) -> String) {
    for instr in &algo.instrs {
        check_instr(instr, map, handler, resolve_name);
    }
}

fn check_instr(instr: &Instr, map: &mut TypeMap, handler: &mut Handler, resolve_name: &impl Fn(Symbol) -> String) {
    match instr {
        Instr::Halt { .. } => {}
        Instr::Print { output, .. } => check_output(output, map),
        Instr::Call { args, .. } => {
            for arg in args {
                type_atom(arg, map);
            }
        }
        Instr::Assign(assign) => check_assign(assign, map, handler, resolve_name),
        Instr::LoopWhile(l) => {
            check_condition(&l.cond, map, handler, resolve_name);
            check_algo(&l.body, map, handler, resolve_name);
        }
        Instr::LoopDoUntil(l) => {
            check_algo(&l.body, map, handler, resolve_name);
            check_condition(&l.cond, map, handler, resolve_name);
        }
        Instr::BranchIf(b) => {
            check_condition(&b.cond, map, handler, resolve_name);
            check_algo(&b.then_branch, map, handler, resolve_name);
            if let Some(else_branch) = &b.else_branch {
                check_algo(else_branch, map, handler, resolve_name);
            }
        }
    }
}

fn check_assign(assign: &Assign, map: &mut TypeMap, handler: &mut Handler, resolve_name: &impl Fn(Symbol) -> String) {
    match &assign.rhs {
        AssignRhs::Call { args, .. } => {
            // A function call's result is Numeric by construction; args
            // are Atoms, themselves always Numeric (see `type_atom`).
            for arg in args {
                type_atom(arg, map);
            }
        }
        AssignRhs::Term(term) => {
            let ty = type_term(term, map, handler);
            if ty != TypeKind::Numeric {
                handler.push(
                    Diagnostic::new(
                        DiagnosticKind::TypeError,
                        format!(
                            "cannot assign a {} value to '{}', which is Numeric",
                            ty,
                            resolve_name(assign.target)
                        ),
                    )
                    .with_node(assign.node_id),
                );
            }
        }
    }
}

/// `while`/`do-until`/`if` conditions must be Boolean. A bare Numeric atom
/// is rejected rather than widened — see the "Truthiness of atoms as
/// conditions" decision.
fn check_condition(cond: &Term, map: &mut TypeMap, handler: &mut Handler, _resolve_name: &impl Fn(Symbol) -> String) {
    let ty = type_term(cond, map, handler);
    if ty != TypeKind::Boolean {
        handler.push(
            Diagnostic::new(
                DiagnosticKind::TypeError,
                format!("condition must be Boolean, found {ty}"),
            )
            .with_node(cond.node_id()),
        );
    }
}

fn check_output(output: &Output, map: &mut TypeMap) {
    match output {
        Output::Atom(atom) => {
            type_atom(atom, map);
        }
        Output::StringLit { node_id, .. } => map.set(*node_id, TypeKind::String),
    }
}

fn type_atom(atom: &Atom, map: &mut TypeMap) -> TypeKind {
    let ty = TypeKind::Numeric;
    map.set(atom.node_id(), ty);
    ty
}

/// Every unary/binary node's result type is fixed by its operator; the
/// only thing this walk must actually *check* is that each operand's
/// inferred type matches what that operator demands —
/// mismatches become `TypeError`s but never abort the walk, so the parent
/// node still gets a type and sibling subtrees are still checked.
fn type_term(term: &Term, map: &mut TypeMap, handler: &mut Handler) -> TypeKind {
    match term {
        Term::Atom(atom) => type_atom(atom, map),
        Term::Unary { node_id, op, term } => {
            let operand_ty = type_term(term, map, handler);
            let expected = unary_operand_kind(*op);
            if operand_ty != expected {
                handler.push(
                    Diagnostic::new(
                        DiagnosticKind::TypeError,
                        format!("operand of '{}' must be {expected}, found {operand_ty}", unop_name(*op)),
                    )
                    .with_node(term.node_id()),
                );
            }
            let result = unary_result(*op);
            map.set(*node_id, result);
            result
        }
        Term::Binary { node_id, lhs, op, rhs } => {
            let lty = type_term(lhs, map, handler);
            let rty = type_term(rhs, map, handler);
            let expected = binary_operand_kind(*op);
            if lty != expected || rty != expected {
                handler.push(
                    Diagnostic::new(
                        DiagnosticKind::TypeError,
                        format!("operands of '{}' must both be {expected}, found {lty} and {rty}", binop_name(*op)),
                    )
                    .with_node(*node_id),
                );
            }
            let result = binary_result(*op);
            map.set(*node_id, result);
            result
        }
    }
}

fn unop_name(op: UnOp) -> &'static str {
    match op {
        UnOp::Neg => "neg",
        UnOp::Not => "not",
    }
}

fn binop_name(op: BinOp) -> &'static str {
    match op {
        BinOp::Plus => "plus",
        BinOp::Minus => "minus",
        BinOp::Mult => "mult",
        BinOp::Div => "div",
        BinOp::Eq => "eq",
        BinOp::Gt => ">",
        BinOp::Or => "or",
        BinOp::And => "and",
    }
}

fn unary_operand_kind(op: UnOp) -> TypeKind {
    match op {
        UnOp::Neg => TypeKind::Numeric,
        UnOp::Not => TypeKind::Boolean,
    }
}

fn unary_result(op: UnOp) -> TypeKind {
    match op {
        UnOp::Neg => TypeKind::Numeric,
        UnOp::Not => TypeKind::Boolean,
    }
}

fn binary_result(op: BinOp) -> TypeKind {
    match op {
        BinOp::Plus | BinOp::Minus | BinOp::Mult | BinOp::Div => TypeKind::Numeric,
        BinOp::Eq | BinOp::Gt => TypeKind::Boolean,
        BinOp::Or | BinOp::And => TypeKind::Boolean,
    }
}

fn binary_operand_kind(op: BinOp) -> TypeKind {
    match op {
        BinOp::Plus | BinOp::Minus | BinOp::Mult | BinOp::Div | BinOp::Eq | BinOp::Gt => TypeKind::Numeric,
        BinOp::Or | BinOp::And => TypeKind::Boolean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::check_scopes;
    use spl_lex::Lexer;
    use spl_par::{assign_ids, Parser};

    fn compile(src: &str) -> (Program, Interner, Handler) {
        let mut interner = Interner::new();
        let tokens = Lexer::tokenize(src, &mut interner).unwrap();
        let mut program = Parser::parse_program(&tokens, &interner).unwrap();
        assign_ids(&mut program);
        let mut handler = Handler::new();
        let resolution = check_scopes(&program, &interner, &mut handler);
        assert!(!handler.has_errors(), "scope errors: {:?}", handler.diagnostics().iter().map(|d| d.to_string()).collect::<Vec<_>>());
        let mut type_handler = Handler::new();
        let _ = check_types(&program, &resolution, &interner, &mut type_handler);
        (program, interner, type_handler)
    }

    #[test]
    fn numeric_arithmetic_type_checks() {
        let (_, _, handler) = compile("glob { } proc { } func { } main { var { x } x = ( 1 plus 2 ); halt }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn comparison_condition_type_checks() {
        let (_, _, handler) = compile("glob { } proc { } func { } main { var { i } i = 0; while ( i > 0 ) { halt } halt }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn boolean_rhs_assigned_to_numeric_target_is_a_type_error() {
        let (_, _, handler) = compile("glob { } proc { } func { } main { var { x } x = ( 1 > 0 ); halt }");
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::TypeError));
    }

    #[test]
    fn bare_atom_condition_is_rejected_strictly() {
        let (_, _, handler) = compile("glob { } proc { } func { } main { var { i } i = 1; while i { halt } halt }");
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::TypeError));
    }

    #[test]
    fn and_or_require_boolean_operands() {
        let (_, _, handler) =
            compile("glob { } proc { } func { } main { var { i } i = 1; if ( ( i > 0 ) and ( i > 0 ) ) { halt } halt }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn not_applied_to_numeric_operand_is_a_type_error() {
        let (_, _, handler) = compile("glob { } proc { } func { } main { var { x } x = 1; if ( not 1 ) { halt } halt }");
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::TypeError));
    }

    #[test]
    fn neg_applied_to_boolean_operand_is_a_type_error() {
        let (_, _, handler) =
            compile("glob { } proc { } func { } main { var { x } x = ( neg ( 1 > 0 ) ); halt }");
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::TypeError));
    }

    #[test]
    fn plus_with_a_boolean_operand_is_a_type_error() {
        let (_, _, handler) = compile("glob { } proc { } func { } main { var { x } x = ( 1 plus ( 1 > 0 ) ); halt }");
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::TypeError));
    }

    #[test]
    fn or_with_a_numeric_operand_is_a_type_error() {
        let (_, _, handler) =
            compile("glob { } proc { } func { } main { var { i } i = 1; if ( ( i > 0 ) or i ) { halt } halt }");
        assert!(handler.diagnostics().iter().any(|d| d.kind == DiagnosticKind::TypeError));
    }
}
