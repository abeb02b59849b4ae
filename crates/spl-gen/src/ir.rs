//! The intermediate listing: a flat, unnumbered instruction list with
//! symbolic `REM` labels, produced by inlining every call and expanding
//! loops/branches into label-chained jumps.
//!
//! Each [`Line`] variant renders to exactly one line of the textual
//! intermediate format; [`crate::emit`] assigns line numbers and resolves
//! labels against it.

use rustc_hash::FxHashMap;
use spl_par::ast::*;
use spl_util::{Interner, Symbol};
use std::fmt;

use crate::error::EmitError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A symbolic label marker: `REM <label>`.
    Rem(String),
    /// `PRINT <rendered atom or string literal>`.
    Print(String),
    /// `<target> = <rendered term>`.
    Assign { target: String, expr: String },
    Stop,
    Goto(String),
    /// `IF <rendered condition> THEN <label>`.
    IfThen { cond: String, label: String },
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Rem(label) => write!(f, "REM {label}"),
            Line::Print(text) => write!(f, "PRINT {text}"),
            Line::Assign { target, expr } => write!(f, "{target} = {expr}"),
            Line::Stop => write!(f, "STOP"),
            Line::Goto(label) => write!(f, "GOTO {label}"),
            Line::IfThen { cond, label } => write!(f, "IF {cond} THEN {label}"),
        }
    }
}

/// Renders a full intermediate listing, one instruction per line.
pub fn render_intermediate(lines: &[Line]) -> String {
    lines.iter().map(Line::to_string).collect::<Vec<_>>().join("\n")
}

/// Runs the generator over `program`'s `main` algorithm, producing the
/// intermediate listing. Procedures and functions are never emitted on
/// their own — they only appear inlined at their call sites.
pub fn generate(program: &Program, interner: &Interner) -> Result<Vec<Line>, EmitError> {
    let mut gen = Generator::new(program, interner);
    gen.gen_algo(&program.main.algo)?;
    Ok(gen.lines)
}

struct Generator<'a> {
    interner: &'a Interner,
    procs: FxHashMap<Symbol, &'a ProcDef>,
    funcs: FxHashMap<Symbol, &'a FuncDef>,
    label_counter: u32,
    /// Names currently being inlined, innermost last — a call whose callee
    /// is already on this stack would make inlining diverge.
    inlining_stack: Vec<Symbol>,
    /// The single substitution frame in effect while generating an inlined
    /// body: the callee's own parameter names, mapped to their already
    /// fully-rendered argument text. `None` outside of any inlined call.
    active_subst: Option<FxHashMap<Symbol, String>>,
    lines: Vec<Line>,
}

impl<'a> Generator<'a> {
    fn new(program: &'a Program, interner: &'a Interner) -> Self {
        let procs = program.procs.iter().map(|p| (p.name, p)).collect();
        let funcs = program.funcs.iter().map(|f| (f.name, f)).collect();
        Self {
            interner,
            procs,
            funcs,
            label_counter: 0,
            inlining_stack: Vec::new(),
            active_subst: None,
            lines: Vec::new(),
        }
    }

    fn resolve(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    fn mint_label(&mut self, prefix: &str) -> String {
        self.label_counter += 1;
        format!("{prefix}{}", self.label_counter)
    }

    fn gen_algo(&mut self, algo: &Algo) -> Result<(), EmitError> {
        for instr in &algo.instrs {
            self.gen_instr(instr)?;
        }
        Ok(())
    }

    fn gen_instr(&mut self, instr: &Instr) -> Result<(), EmitError> {
        match instr {
            Instr::Halt { .. } => self.lines.push(Line::Stop),
            Instr::Print { output, .. } => {
                let text = self.render_output(output);
                self.lines.push(Line::Print(text));
            }
            Instr::Call { name, args, .. } => self.inline_proc_call(*name, args)?,
            Instr::Assign(assign) => self.gen_assign(assign)?,
            Instr::LoopWhile(l) => self.gen_while(l)?,
            Instr::LoopDoUntil(l) => self.gen_do_until(l)?,
            Instr::BranchIf(b) => self.gen_if(b)?,
        }
        Ok(())
    }

    fn gen_assign(&mut self, assign: &Assign) -> Result<(), EmitError> {
        let target = self.render_name(assign.target);
        let expr = match &assign.rhs {
            AssignRhs::Call { name, args } => self.inline_func_call(*name, args)?,
            AssignRhs::Term(term) => self.render_term(term)?,
        };
        self.lines.push(Line::Assign { target, expr });
        Ok(())
    }

    fn gen_while(&mut self, l: &LoopWhile) -> Result<(), EmitError> {
        let wh = self.mint_label("WH");
        let wb = self.mint_label("WB");
        let we = self.mint_label("WE");
        self.lines.push(Line::Rem(wh.clone()));
        self.gen_condition(&l.cond, &wb, &we)?;
        self.lines.push(Line::Rem(wb));
        self.gen_algo(&l.body)?;
        self.lines.push(Line::Goto(wh));
        self.lines.push(Line::Rem(we));
        Ok(())
    }

    /// A `do-until` shares `while`'s branch machinery with its targets
    /// swapped: the loop repeats while the condition is *false* and exits
    /// once it is true, so the condition is compiled with "true" meaning
    /// "leave the loop" rather than "continue it".
    fn gen_do_until(&mut self, l: &LoopDoUntil) -> Result<(), EmitError> {
        let do_label = self.mint_label("DO");
        let exit_label = self.mint_label("DX");
        self.lines.push(Line::Rem(do_label.clone()));
        self.gen_algo(&l.body)?;
        self.gen_condition(&l.cond, &exit_label, &do_label)?;
        self.lines.push(Line::Rem(exit_label));
        Ok(())
    }

    fn gen_if(&mut self, b: &BranchIf) -> Result<(), EmitError> {
        let t = self.mint_label("T");
        let x = self.mint_label("X");
        match &b.else_branch {
            None => {
                self.gen_condition(&b.cond, &t, &x)?;
                self.lines.push(Line::Rem(t));
                self.gen_algo(&b.then_branch)?;
                self.lines.push(Line::Rem(x));
            }
            Some(else_branch) => {
                let e = self.mint_label("E");
                self.gen_condition(&b.cond, &t, &e)?;
                self.lines.push(Line::Rem(e));
                self.gen_algo(else_branch)?;
                self.lines.push(Line::Goto(x.clone()));
                self.lines.push(Line::Rem(t));
                self.gen_algo(&b.then_branch)?;
                self.lines.push(Line::Rem(x));
            }
        }
        Ok(())
    }

    /// Compiles `term` (always Boolean-typed by the time codegen runs) into
    /// branches: execution reaches `true_label` if it holds, `false_label`
    /// otherwise. `and`/`or` expand into short-circuit label chains; `not`
    /// is free — it just swaps the two targets of its operand.
    fn gen_condition(&mut self, term: &Term, true_label: &str, false_label: &str) -> Result<(), EmitError> {
        match term {
            Term::Binary { op: BinOp::Eq, lhs, rhs, .. } => self.gen_comparison(lhs, "=", rhs, true_label, false_label),
            Term::Binary { op: BinOp::Gt, lhs, rhs, .. } => self.gen_comparison(lhs, ">", rhs, true_label, false_label),
            Term::Binary { op: BinOp::And, lhs, rhs, .. } => {
                let mid = self.mint_label("AND");
                self.gen_condition(lhs, &mid, false_label)?;
                self.lines.push(Line::Rem(mid));
                self.gen_condition(rhs, true_label, false_label)
            }
            Term::Binary { op: BinOp::Or, lhs, rhs, .. } => {
                let mid = self.mint_label("OR");
                self.gen_condition(lhs, true_label, &mid)?;
                self.lines.push(Line::Rem(mid));
                self.gen_condition(rhs, true_label, false_label)
            }
            Term::Unary { op: UnOp::Not, term, .. } => self.gen_condition(term, false_label, true_label),
            _ => Err(EmitError::Internal(
                "non-boolean term reached condition codegen".to_string(),
            )),
        }
    }

    fn gen_comparison(&mut self, lhs: &Term, op: &str, rhs: &Term, true_label: &str, false_label: &str) -> Result<(), EmitError> {
        let cond = format!("{} {} {}", self.render_term(lhs)?, op, self.render_term(rhs)?);
        self.lines.push(Line::IfThen {
            cond,
            label: true_label.to_string(),
        });
        self.lines.push(Line::Goto(false_label.to_string()));
        Ok(())
    }

    /// Renders an arithmetic term (an assignment's or a comparison
    /// operand's rhs) — never a bare `and`/`or`/`not`, which only ever
    /// appear at a condition's own root once type-checked.
    fn render_term(&self, term: &Term) -> Result<String, EmitError> {
        match term {
            Term::Atom(atom) => Ok(self.render_atom(atom)),
            Term::Unary { op: UnOp::Neg, term, .. } => Ok(format!("(-{})", self.render_term(term)?)),
            Term::Unary { op: UnOp::Not, .. } => {
                Err(EmitError::Internal("'not' used outside a condition".to_string()))
            }
            Term::Binary { op, lhs, rhs, .. } => match arith_symbol(*op) {
                Some(sym) => Ok(format!("({} {} {})", self.render_term(lhs)?, sym, self.render_term(rhs)?)),
                None => Err(EmitError::Internal(
                    "comparison/logical term used outside a condition".to_string(),
                )),
            },
        }
    }

    fn render_atom(&self, atom: &Atom) -> String {
        match atom {
            Atom::VarRef { name, .. } => self.render_name(*name),
            Atom::NumberLit { value, .. } => value.to_string(),
        }
    }

    /// Renders a bare name, substituting through the active inlining frame
    /// if it names one of the currently-inlined definition's parameters.
    fn render_name(&self, name: Symbol) -> String {
        if let Some(frame) = &self.active_subst {
            if let Some(text) = frame.get(&name) {
                return text.clone();
            }
        }
        self.resolve(name)
    }

    fn render_output(&self, output: &Output) -> String {
        match output {
            Output::Atom(atom) => self.render_atom(atom),
            Output::StringLit { text, .. } => format!("\"{}\"", self.interner.resolve(*text)),
        }
    }

    fn inline_proc_call(&mut self, name: Symbol, args: &[Atom]) -> Result<(), EmitError> {
        let proc = *self
            .procs
            .get(&name)
            .ok_or_else(|| EmitError::Internal(format!("undeclared procedure '{}'", self.resolve(name))))?;
        let frame = self.enter_inline(name, &proc.params, args)?;
        let prev = std::mem::replace(&mut self.active_subst, Some(frame));
        self.lines.push(Line::Rem(format!("INLINE PROC {}", self.resolve(name))));
        let result = self.gen_algo(&proc.body.algo);
        self.leave_inline(prev);
        result?;
        self.lines.push(Line::Rem(format!("ENDINLINE PROC {}", self.resolve(name))));
        Ok(())
    }

    /// Like [`Self::inline_proc_call`] but for a function-call assignment:
    /// the callee's final `return ATOM` becomes this call's rendered
    /// result, read back while the callee's frame is still active.
    fn inline_func_call(&mut self, name: Symbol, args: &[Atom]) -> Result<String, EmitError> {
        let func = *self
            .funcs
            .get(&name)
            .ok_or_else(|| EmitError::Internal(format!("undeclared function '{}'", self.resolve(name))))?;
        let frame = self.enter_inline(name, &func.params, args)?;
        let prev = std::mem::replace(&mut self.active_subst, Some(frame));
        self.lines.push(Line::Rem(format!("INLINE FUNC {}", self.resolve(name))));
        let result = self.gen_algo(&func.body.algo).map(|()| self.render_atom(&func.ret));
        self.leave_inline(prev);
        let ret_text = result?;
        self.lines.push(Line::Rem(format!("ENDINLINE FUNC {}", self.resolve(name))));
        Ok(ret_text)
    }

    fn enter_inline(&mut self, name: Symbol, params: &[Symbol], args: &[Atom]) -> Result<FxHashMap<Symbol, String>, EmitError> {
        if self.inlining_stack.contains(&name) {
            let mut chain: Vec<String> = self.inlining_stack.iter().map(|&s| self.resolve(s)).collect();
            chain.push(self.resolve(name));
            return Err(EmitError::RecursiveInline { chain: chain.join(" -> ") });
        }
        let frame = params.iter().zip(args).map(|(&p, a)| (p, self.render_atom(a))).collect();
        self.inlining_stack.push(name);
        Ok(frame)
    }

    fn leave_inline(&mut self, prev: Option<FxHashMap<Symbol, String>>) {
        self.inlining_stack.pop();
        self.active_subst = prev;
    }
}

fn arith_symbol(op: BinOp) -> Option<&'static str> {
    match op {
        BinOp::Plus => Some("+"),
        BinOp::Minus => Some("-"),
        BinOp::Mult => Some("*"),
        BinOp::Div => Some("/"),
        _ => None,
    }
}
