//! `assign_ids` — the post-parse DFS that stamps every node's `node_id`.
//!
//! Parsing itself leaves every `node_id` at the placeholder value `0`; this
//! module is the single pass (run once by the driver, between parsing and
//! scope checking) that walks the finished tree pre-order and overwrites
//! each `node_id` with a monotonically increasing counter starting at 1. Node
//! construction order inside the parser is therefore irrelevant to the final
//! numbering — only this traversal's order is.

use crate::ast::*;

pub fn assign_ids(program: &mut Program) {
    let mut next = 1u32;
    visit_program(program, &mut next);
}

fn bump(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}

fn visit_program(p: &mut Program, n: &mut u32) {
    p.node_id = bump(n);
    for proc in &mut p.procs {
        visit_proc(proc, n);
    }
    for func in &mut p.funcs {
        visit_func(func, n);
    }
    visit_main(&mut p.main, n);
}

fn visit_proc(p: &mut ProcDef, n: &mut u32) {
    p.node_id = bump(n);
    visit_body(&mut p.body, n);
}

fn visit_func(f: &mut FuncDef, n: &mut u32) {
    f.node_id = bump(n);
    visit_body(&mut f.body, n);
    visit_atom(&mut f.ret, n);
}

fn visit_body(b: &mut Body, n: &mut u32) {
    b.node_id = bump(n);
    visit_algo(&mut b.algo, n);
}

fn visit_main(m: &mut Main, n: &mut u32) {
    m.node_id = bump(n);
    visit_algo(&mut m.algo, n);
}

fn visit_algo(a: &mut Algo, n: &mut u32) {
    a.node_id = bump(n);
    for instr in &mut a.instrs {
        visit_instr(instr, n);
    }
}

fn visit_instr(i: &mut Instr, n: &mut u32) {
    match i {
        Instr::Halt { node_id } => *node_id = bump(n),
        Instr::Print { node_id, output } => {
            *node_id = bump(n);
            visit_output(output, n);
        }
        Instr::Call { node_id, args, .. } => {
            *node_id = bump(n);
            for arg in args {
                visit_atom(arg, n);
            }
        }
        Instr::Assign(assign) => visit_assign(assign, n),
        Instr::LoopWhile(loop_while) => visit_loop_while(loop_while, n),
        Instr::LoopDoUntil(loop_do_until) => visit_loop_do_until(loop_do_until, n),
        Instr::BranchIf(branch_if) => visit_branch_if(branch_if, n),
    }
}

fn visit_assign(a: &mut Assign, n: &mut u32) {
    a.node_id = bump(n);
    match &mut a.rhs {
        AssignRhs::Call { args, .. } => {
            for arg in args {
                visit_atom(arg, n);
            }
        }
        AssignRhs::Term(term) => visit_term(term, n),
    }
}

fn visit_loop_while(l: &mut LoopWhile, n: &mut u32) {
    l.node_id = bump(n);
    visit_term(&mut l.cond, n);
    visit_algo(&mut l.body, n);
}

fn visit_loop_do_until(l: &mut LoopDoUntil, n: &mut u32) {
    l.node_id = bump(n);
    visit_algo(&mut l.body, n);
    visit_term(&mut l.cond, n);
}

fn visit_branch_if(b: &mut BranchIf, n: &mut u32) {
    b.node_id = bump(n);
    visit_term(&mut b.cond, n);
    visit_algo(&mut b.then_branch, n);
    if let Some(else_branch) = &mut b.else_branch {
        visit_algo(else_branch, n);
    }
}

fn visit_term(t: &mut Term, n: &mut u32) {
    match t {
        Term::Atom(atom) => visit_atom(atom, n),
        Term::Unary { node_id, term, .. } => {
            *node_id = bump(n);
            visit_term(term, n);
        }
        Term::Binary { node_id, lhs, rhs, .. } => {
            *node_id = bump(n);
            visit_term(lhs, n);
            visit_term(rhs, n);
        }
    }
}

fn visit_atom(a: &mut Atom, n: &mut u32) {
    match a {
        Atom::VarRef { node_id, .. } => *node_id = bump(n),
        Atom::NumberLit { node_id, .. } => *node_id = bump(n),
    }
}

fn visit_output(o: &mut Output, n: &mut u32) {
    match o {
        Output::Atom(atom) => visit_atom(atom, n),
        Output::StringLit { node_id, .. } => *node_id = bump(n),
    }
}
