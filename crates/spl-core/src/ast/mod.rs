//! Abstract Syntax Tree for SPL.
//!
//! This module provides:
//! - [`Node`] and [`NodeKind`]: one tagged variant per SPL construct
//! - [`Ast`]: an immutable arena of nodes addressed by [`NodeId`]
//! - [`AstBuilder`]: the only way to construct an `Ast`
//!
//! Nodes refer to their children by id. A node id is the node's index in
//! the arena, so ids are unique and stable, and later phases can key side
//! tables (such as the symbol table) by them.
//!
//! # Example
//!
//! ```
//! use spl_core::{AstBuilder, BinaryOp, ProgramBlocks, Span};
//!
//! let mut b = AstBuilder::new();
//! let globals = b.globals(vec![]);
//! let procs = b.procedures(vec![]);
//! let funcs = b.functions(vec![]);
//! let x = b.var("x");
//! let target = b.var("x");
//! let one = b.number("1");
//! let value = b.binary(BinaryOp::Plus, x, one);
//! let assign = b.assign(target, value);
//! let algo = b.algo(vec![assign]);
//! let decl = b.var("x");
//! let main = b.main(vec![decl], algo);
//! let ast = b.finish(ProgramBlocks { globals, procs, funcs, main }, Span::default());
//!
//! assert_eq!(ast.kind(ast.root()).tag(), "program");
//! ```

mod builder;

pub use builder::AstBuilder;

use crate::{BinaryOp, NodeId, Span, UnaryOp};

// ============================================================================
// Nodes
// ============================================================================

/// The four top-level blocks of a program.
///
/// `glob`, `proc` and `func` are optional in source, but the tree always
/// contains a (possibly empty) block for each so that every program has the
/// three scope-class nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramBlocks {
    pub globals: NodeId,
    pub procs: NodeId,
    pub funcs: NodeId,
    pub main: NodeId,
}

/// A single AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub span: Span,
}

/// Every SPL construct, with its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Program structure
    Program(ProgramBlocks),
    /// `glob { VAR* }`
    Globals { vars: Vec<NodeId> },
    /// `proc { PDEF* }`
    Procedures { defs: Vec<NodeId> },
    /// `func { FDEF* }`
    Functions { defs: Vec<NodeId> },
    /// `main { var { VAR* } ALGO }`
    Main { vars: Vec<NodeId>, algo: NodeId },
    /// `NAME ( VAR* ) { BODY }`
    Procedure {
        name: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
    },
    /// `NAME ( VAR* ) { BODY ; return ATOM }`
    Function {
        name: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
        ret: NodeId,
    },
    /// `local { VAR* } ALGO`
    Body { locals: Vec<NodeId>, algo: NodeId },
    /// `INSTR ; INSTR ; ...`
    Algo { instrs: Vec<NodeId> },

    // Instructions
    Halt,
    Print { value: NodeId },
    Call { name: NodeId, args: Vec<NodeId> },
    Assign { target: NodeId, value: NodeId },
    CallAssign {
        target: NodeId,
        name: NodeId,
        args: Vec<NodeId>,
    },
    While { cond: NodeId, body: NodeId },
    DoUntil { body: NodeId, cond: NodeId },
    If { cond: NodeId, then: NodeId },
    IfElse {
        cond: NodeId,
        then: NodeId,
        otherwise: NodeId,
    },

    // Terms
    Unary { op: UnaryOp, operand: NodeId },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },

    // Leaves
    /// A variable occurrence (declaration or use).
    Var(String),
    /// A procedure or function name occurrence (declaration or call target).
    Name(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// A string literal, without its quotes.
    Text(String),
}

impl NodeKind {
    /// Short name of the construct, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Program(_) => "program",
            NodeKind::Globals { .. } => "glob",
            NodeKind::Procedures { .. } => "proc",
            NodeKind::Functions { .. } => "func",
            NodeKind::Main { .. } => "main",
            NodeKind::Procedure { .. } => "pdef",
            NodeKind::Function { .. } => "fdef",
            NodeKind::Body { .. } => "body",
            NodeKind::Algo { .. } => "algo",
            NodeKind::Halt => "halt",
            NodeKind::Print { .. } => "print",
            NodeKind::Call { .. } => "call",
            NodeKind::Assign { .. } => "assign",
            NodeKind::CallAssign { .. } => "call",
            NodeKind::While { .. } => "while",
            NodeKind::DoUntil { .. } => "do",
            NodeKind::If { .. } => "if",
            NodeKind::IfElse { .. } => "ifelse",
            NodeKind::Unary { op, .. } => op.as_str(),
            NodeKind::Binary { op, .. } => op.as_str(),
            NodeKind::Var(_) => "var",
            NodeKind::Name(_) => "name",
            NodeKind::Number(_) => "number",
            NodeKind::Text(_) => "string",
        }
    }

    /// The ordered child ids of this node.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program(b) => vec![b.globals, b.procs, b.funcs, b.main],
            NodeKind::Globals { vars } => vars.clone(),
            NodeKind::Procedures { defs } | NodeKind::Functions { defs } => defs.clone(),
            NodeKind::Main { vars, algo } => {
                let mut out = vars.clone();
                out.push(*algo);
                out
            }
            NodeKind::Procedure { name, params, body } => {
                let mut out = vec![*name];
                out.extend(params);
                out.push(*body);
                out
            }
            NodeKind::Function {
                name,
                params,
                body,
                ret,
            } => {
                let mut out = vec![*name];
                out.extend(params);
                out.push(*body);
                out.push(*ret);
                out
            }
            NodeKind::Body { locals, algo } => {
                let mut out = locals.clone();
                out.push(*algo);
                out
            }
            NodeKind::Algo { instrs } => instrs.clone(),
            NodeKind::Print { value } => vec![*value],
            NodeKind::Call { name, args } => {
                let mut out = vec![*name];
                out.extend(args);
                out
            }
            NodeKind::Assign { target, value } => vec![*target, *value],
            NodeKind::CallAssign { target, name, args } => {
                let mut out = vec![*target, *name];
                out.extend(args);
                out
            }
            NodeKind::While { cond, body } => vec![*cond, *body],
            NodeKind::DoUntil { body, cond } => vec![*body, *cond],
            NodeKind::If { cond, then } => vec![*cond, *then],
            NodeKind::IfElse {
                cond,
                then,
                otherwise,
            } => vec![*cond, *then, *otherwise],
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            NodeKind::Halt
            | NodeKind::Var(_)
            | NodeKind::Name(_)
            | NodeKind::Number(_)
            | NodeKind::Text(_) => Vec::new(),
        }
    }

    /// Whether this node is an atom (`VAR` or number literal).
    pub fn is_atom(&self) -> bool {
        matches!(self, NodeKind::Var(_) | NodeKind::Number(_))
    }
}

// ============================================================================
// Ast
// ============================================================================

/// An immutable SPL syntax tree.
///
/// Built once by [`AstBuilder`] (directly or through the parser) and only
/// read afterwards.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    blocks: ProgramBlocks,
}

impl Ast {
    /// The `Program` node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The four top-level blocks of the root `Program` node.
    #[inline]
    pub fn blocks(&self) -> ProgramBlocks {
        self.blocks
    }

    /// Look up a node.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Look up a node, returning `None` for ids from another tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// The ordered child ids of a node.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// The identifier carried by a `Var` or `Name` node.
    pub fn ident(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Var(name) | NodeKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}
