//! The AST node set.
//!
//! Every node carries a `node_id: NodeId`, stamped `0` (a placeholder) at
//! parse time and overwritten with its real, unique value by [`crate::ids`]
//! in a single DFS that runs once parsing has finished. Nodes are otherwise
//! immutable: the scope checker records variable resolution in a side table
//! keyed by `NodeId` rather than mutating `VarRef` in place (see
//! `spl-sem::resolve`) — this keeps the tree itself free of interior
//! mutability.

use spl_util::Symbol;

pub type NodeId = u32;

#[derive(Debug, Clone)]
pub struct Program {
    pub node_id: NodeId,
    pub globals: Vec<Symbol>,
    pub procs: Vec<ProcDef>,
    pub funcs: Vec<FuncDef>,
    pub main: Main,
}

#[derive(Debug, Clone)]
pub struct ProcDef {
    pub node_id: NodeId,
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: Body,
}

#[derive(Debug, Clone)]
pub struct FuncDef {
    pub node_id: NodeId,
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: Body,
    pub ret: Atom,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub node_id: NodeId,
    pub locals: Vec<Symbol>,
    pub algo: Algo,
}

#[derive(Debug, Clone)]
pub struct Main {
    pub node_id: NodeId,
    pub variables: Vec<Symbol>,
    pub algo: Algo,
}

#[derive(Debug, Clone)]
pub struct Algo {
    pub node_id: NodeId,
    pub instrs: Vec<Instr>,
}

#[derive(Debug, Clone)]
pub enum Instr {
    Halt {
        node_id: NodeId,
    },
    Print {
        node_id: NodeId,
        output: Output,
    },
    Call {
        node_id: NodeId,
        name: Symbol,
        args: Vec<Atom>,
    },
    Assign(Assign),
    LoopWhile(LoopWhile),
    LoopDoUntil(LoopDoUntil),
    BranchIf(BranchIf),
}

impl Instr {
    pub fn node_id(&self) -> NodeId {
        match self {
            Instr::Halt { node_id } => *node_id,
            Instr::Print { node_id, .. } => *node_id,
            Instr::Call { node_id, .. } => *node_id,
            Instr::Assign(a) => a.node_id,
            Instr::LoopWhile(l) => l.node_id,
            Instr::LoopDoUntil(l) => l.node_id,
            Instr::BranchIf(b) => b.node_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assign {
    pub node_id: NodeId,
    pub target: Symbol,
    pub rhs: AssignRhs,
}

#[derive(Debug, Clone)]
pub enum AssignRhs {
    Call { name: Symbol, args: Vec<Atom> },
    Term(Term),
}

#[derive(Debug, Clone)]
pub struct LoopWhile {
    pub node_id: NodeId,
    pub cond: Term,
    pub body: Algo,
}

#[derive(Debug, Clone)]
pub struct LoopDoUntil {
    pub node_id: NodeId,
    pub body: Algo,
    pub cond: Term,
}

#[derive(Debug, Clone)]
pub struct BranchIf {
    pub node_id: NodeId,
    pub cond: Term,
    pub then_branch: Algo,
    pub else_branch: Option<Algo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Mult,
    Div,
    Eq,
    Gt,
    Or,
    And,
}

#[derive(Debug, Clone)]
pub enum Term {
    Atom(Atom),
    Unary {
        node_id: NodeId,
        op: UnOp,
        term: Box<Term>,
    },
    Binary {
        node_id: NodeId,
        lhs: Box<Term>,
        op: BinOp,
        rhs: Box<Term>,
    },
}

impl Term {
    pub fn node_id(&self) -> NodeId {
        match self {
            Term::Atom(a) => a.node_id(),
            Term::Unary { node_id, .. } => *node_id,
            Term::Binary { node_id, .. } => *node_id,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Atom {
    VarRef { node_id: NodeId, name: Symbol },
    NumberLit { node_id: NodeId, value: i64 },
}

impl Atom {
    pub fn node_id(&self) -> NodeId {
        match self {
            Atom::VarRef { node_id, .. } => *node_id,
            Atom::NumberLit { node_id, .. } => *node_id,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Output {
    Atom(Atom),
    StringLit { node_id: NodeId, text: Symbol },
}
