//! Analysis passes.
//!
//! - [`resolve`]: build the symbol table (must run first)
//! - [`typecheck`]: numeric/boolean typing and call-shape checks
//! - [`recursion`]: reject call cycles so every call can be inlined
//!
//! The type checker and the recursion validator only read the tree and the
//! symbol table, so they may run in either order.

pub mod recursion;
pub mod resolve;
pub mod typecheck;

pub use recursion::RecursionValidator;
pub use resolve::ScopeResolver;
pub use typecheck::TypeChecker;

use spl_core::{Ast, CompilationError, NodeId, NodeKind, Span};

use crate::SymbolTable;

pub type Result<T> = std::result::Result<T, CompilationError>;

/// Error for a node that sits where its kind is not allowed.
pub(crate) fn malformed(ast: &Ast, id: NodeId, expected: &'static str) -> CompilationError {
    let (found, span) = ast
        .get(id)
        .map_or(("foreign node", Span::default()), |node| {
            (node.kind.tag(), node.span)
        });
    CompilationError::MalformedTree {
        expected,
        found,
        span,
    }
}

/// The `(name, params, body, ret)` parts of a procedure or function definition.
pub(crate) struct DefParts<'a> {
    pub name: NodeId,
    pub params: &'a [NodeId],
    pub body: NodeId,
    pub ret: Option<NodeId>,
}

pub(crate) fn def_parts(ast: &Ast, def: NodeId) -> Result<DefParts<'_>> {
    match ast.kind(def) {
        NodeKind::Procedure { name, params, body } => Ok(DefParts {
            name: *name,
            params,
            body: *body,
            ret: None,
        }),
        NodeKind::Function {
            name,
            params,
            body,
            ret,
        } => Ok(DefParts {
            name: *name,
            params,
            body: *body,
            ret: Some(*ret),
        }),
        _ => Err(malformed(ast, def, "procedure or function definition")),
    }
}

/// The `(locals, algo)` of a definition body.
pub(crate) fn body_parts(ast: &Ast, body: NodeId) -> Result<(&[NodeId], NodeId)> {
    match ast.kind(body) {
        NodeKind::Body { locals, algo } => Ok((locals, *algo)),
        _ => Err(malformed(ast, body, "body")),
    }
}

/// The instructions of an `Algo` node.
pub(crate) fn algo_instrs(ast: &Ast, algo: NodeId) -> Result<&[NodeId]> {
    match ast.kind(algo) {
        NodeKind::Algo { instrs } => Ok(instrs),
        _ => Err(malformed(ast, algo, "algorithm")),
    }
}

/// Definition nodes of the `proc` and `func` blocks, procedures first.
pub(crate) fn all_definitions(ast: &Ast) -> Result<Vec<NodeId>> {
    let blocks = ast.blocks();
    let procs = match ast.kind(blocks.procs) {
        NodeKind::Procedures { defs } => defs,
        _ => return Err(malformed(ast, blocks.procs, "proc block")),
    };
    let funcs = match ast.kind(blocks.funcs) {
        NodeKind::Functions { defs } => defs,
        _ => return Err(malformed(ast, blocks.funcs, "func block")),
    };
    Ok(procs.iter().chain(funcs).copied().collect())
}

/// The definition a call-target name resolves to.
pub(crate) fn callee(ast: &Ast, symbols: &SymbolTable, name: NodeId) -> Result<NodeId> {
    symbols
        .definition_of(name)
        .ok_or_else(|| malformed(ast, name, "resolved procedure or function name"))
}
