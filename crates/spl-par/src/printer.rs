//! `ast::print` — a side-effect-free pretty-printer for `--print-ast`.
//!
//! Renders an indented tree annotated with each node's `#id`. Purely a
//! debugging aid: nothing downstream reads its output.

use crate::ast::*;
use spl_util::Interner;
use std::fmt::Write;

pub fn print_program(program: &Program, interner: &Interner) -> String {
    let mut out = String::new();
    writeln!(out, "Program #{}", program.node_id).unwrap();
    writeln!(out, "  globals: {}", join_names(&program.globals, interner)).unwrap();
    for proc in &program.procs {
        print_proc(&mut out, proc, interner, 1);
    }
    for func in &program.funcs {
        print_func(&mut out, func, interner, 1);
    }
    print_main(&mut out, &program.main, interner, 1);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn join_names(names: &[spl_util::Symbol], interner: &Interner) -> String {
    names.iter().map(|s| interner.resolve(*s)).collect::<Vec<_>>().join(", ")
}

fn print_proc(out: &mut String, p: &ProcDef, interner: &Interner, depth: usize) {
    indent(out, depth);
    writeln!(out, "ProcDef #{} {}({})", p.node_id, interner.resolve(p.name), join_names(&p.params, interner)).unwrap();
    print_body(out, &p.body, interner, depth + 1);
}

fn print_func(out: &mut String, f: &FuncDef, interner: &Interner, depth: usize) {
    indent(out, depth);
    writeln!(out, "FuncDef #{} {}({})", f.node_id, interner.resolve(f.name), join_names(&f.params, interner)).unwrap();
    print_body(out, &f.body, interner, depth + 1);
    indent(out, depth + 1);
    writeln!(out, "return {}", print_atom(&f.ret, interner)).unwrap();
}

fn print_body(out: &mut String, b: &Body, interner: &Interner, depth: usize) {
    indent(out, depth);
    writeln!(out, "Body #{} locals: {}", b.node_id, join_names(&b.locals, interner)).unwrap();
    print_algo(out, &b.algo, interner, depth + 1);
}

fn print_main(out: &mut String, m: &Main, interner: &Interner, depth: usize) {
    indent(out, depth);
    writeln!(out, "Main #{} variables: {}", m.node_id, join_names(&m.variables, interner)).unwrap();
    print_algo(out, &m.algo, interner, depth + 1);
}

fn print_algo(out: &mut String, a: &Algo, interner: &Interner, depth: usize) {
    indent(out, depth);
    writeln!(out, "Algo #{}", a.node_id).unwrap();
    for instr in &a.instrs {
        print_instr(out, instr, interner, depth + 1);
    }
}

fn print_instr(out: &mut String, instr: &Instr, interner: &Interner, depth: usize) {
    indent(out, depth);
    match instr {
        Instr::Halt { node_id } => writeln!(out, "Halt #{node_id}").unwrap(),
        Instr::Print { node_id, output } => {
            writeln!(out, "Print #{node_id} {}", print_output(output, interner)).unwrap();
        }
        Instr::Call { node_id, name, args } => {
            writeln!(out, "Call #{node_id} {}({})", interner.resolve(*name), join_atoms(args, interner)).unwrap();
        }
        Instr::Assign(assign) => print_assign(out, assign, interner, depth),
        Instr::LoopWhile(l) => {
            writeln!(out, "LoopWhile #{} cond: {}", l.node_id, print_term(&l.cond, interner)).unwrap();
            print_algo(out, &l.body, interner, depth + 1);
        }
        Instr::LoopDoUntil(l) => {
            writeln!(out, "LoopDoUntil #{} cond: {}", l.node_id, print_term(&l.cond, interner)).unwrap();
            print_algo(out, &l.body, interner, depth + 1);
        }
        Instr::BranchIf(b) => {
            writeln!(out, "BranchIf #{} cond: {}", b.node_id, print_term(&b.cond, interner)).unwrap();
            print_algo(out, &b.then_branch, interner, depth + 1);
            if let Some(else_branch) = &b.else_branch {
                indent(out, depth);
                out.push_str("else:\n");
                print_algo(out, else_branch, interner, depth + 1);
            }
        }
    }
}

fn print_assign(out: &mut String, a: &Assign, interner: &Interner, depth: usize) {
    match &a.rhs {
        AssignRhs::Call { name, args } => {
            writeln!(
                out,
                "Assign #{} {} = {}({})",
                a.node_id,
                interner.resolve(a.target),
                interner.resolve(*name),
                join_atoms(args, interner)
            )
            .unwrap();
        }
        AssignRhs::Term(term) => {
            writeln!(out, "Assign #{} {} = {}", a.node_id, interner.resolve(a.target), print_term(term, interner)).unwrap();
        }
    }
    let _ = depth;
}

fn join_atoms(atoms: &[Atom], interner: &Interner) -> String {
    atoms.iter().map(|a| print_atom(a, interner)).collect::<Vec<_>>().join(", ")
}

fn print_output(o: &Output, interner: &Interner) -> String {
    match o {
        Output::Atom(a) => print_atom(a, interner),
        Output::StringLit { text, .. } => format!("\"{}\"", interner.resolve(*text)),
    }
}

fn print_atom(a: &Atom, interner: &Interner) -> String {
    match a {
        Atom::VarRef { node_id, name } => format!("{}#{node_id}", interner.resolve(*name)),
        Atom::NumberLit { node_id, value } => format!("{value}#{node_id}"),
    }
}

fn print_term(t: &Term, interner: &Interner) -> String {
    match t {
        Term::Atom(a) => print_atom(a, interner),
        Term::Unary { op, term, .. } => format!("({} {})", unop_str(*op), print_term(term, interner)),
        Term::Binary { lhs, op, rhs, .. } => {
            format!("({} {} {})", print_term(lhs, interner), binop_str(*op), print_term(rhs, interner))
        }
    }
}

fn unop_str(op: UnOp) -> &'static str {
    match op {
        UnOp::Neg => "neg",
        UnOp::Not => "not",
    }
}

fn binop_str(op: BinOp) -> &'static str {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::assign_ids;
    use crate::Parser;
    use spl_lex::Lexer;

    #[test]
    fn prints_a_minimal_program() {
        let src = "glob { } proc { } func { } main { var { x } x = 5; print x; halt }";
        let mut interner = Interner::new();
        let tokens = Lexer::tokenize(src, &mut interner).unwrap();
        let mut program = Parser::parse_program(&tokens, &interner).unwrap();
        assign_ids(&mut program);
        let printed = print_program(&program, &interner);
        assert!(printed.contains("Main #"));
        assert!(printed.contains("Assign #"));
        assert!(printed.contains("x = 5#"));
    }
}
