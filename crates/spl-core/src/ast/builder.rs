use super::{Ast, Node, NodeKind, ProgramBlocks};
use crate::{BinaryOp, NodeId, Span, UnaryOp};

/// Incremental constructor for an [`Ast`].
///
/// Children must be created before their parent. The parser records source
/// spans through [`push`](Self::push); the shorthand constructors use
/// `Span::default()` and exist for building trees by hand.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node { id, kind, span });
        id
    }

    /// Inspect a node created so far.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.index()).map(|n| &n.kind)
    }

    /// Create the `Program` root and freeze the tree.
    pub fn finish(mut self, blocks: ProgramBlocks, span: Span) -> Ast {
        let root = self.push(NodeKind::Program(blocks), span);
        Ast {
            nodes: self.nodes,
            root,
            blocks,
        }
    }

    // ========================================================================
    // Shorthand constructors
    // ========================================================================

    fn add(&mut self, kind: NodeKind) -> NodeId {
        self.push(kind, Span::default())
    }

    pub fn globals(&mut self, vars: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Globals { vars })
    }

    pub fn procedures(&mut self, defs: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Procedures { defs })
    }

    pub fn functions(&mut self, defs: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Functions { defs })
    }

    pub fn main(&mut self, vars: Vec<NodeId>, algo: NodeId) -> NodeId {
        self.add(NodeKind::Main { vars, algo })
    }

    pub fn procedure(&mut self, name: NodeId, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.add(NodeKind::Procedure { name, params, body })
    }

    pub fn function(
        &mut self,
        name: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
        ret: NodeId,
    ) -> NodeId {
        self.add(NodeKind::Function {
            name,
            params,
            body,
            ret,
        })
    }

    pub fn body(&mut self, locals: Vec<NodeId>, algo: NodeId) -> NodeId {
        self.add(NodeKind::Body { locals, algo })
    }

    pub fn algo(&mut self, instrs: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Algo { instrs })
    }

    pub fn halt(&mut self) -> NodeId {
        self.add(NodeKind::Halt)
    }

    pub fn print(&mut self, value: NodeId) -> NodeId {
        self.add(NodeKind::Print { value })
    }

    pub fn call(&mut self, name: NodeId, args: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::Call { name, args })
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.add(NodeKind::Assign { target, value })
    }

    pub fn call_assign(&mut self, target: NodeId, name: NodeId, args: Vec<NodeId>) -> NodeId {
        self.add(NodeKind::CallAssign { target, name, args })
    }

    pub fn while_loop(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        self.add(NodeKind::While { cond, body })
    }

    pub fn do_until(&mut self, body: NodeId, cond: NodeId) -> NodeId {
        self.add(NodeKind::DoUntil { body, cond })
    }

    pub fn if_then(&mut self, cond: NodeId, then: NodeId) -> NodeId {
        self.add(NodeKind::If { cond, then })
    }

    pub fn if_else(&mut self, cond: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        self.add(NodeKind::IfElse {
            cond,
            then,
            otherwise,
        })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.add(NodeKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.add(NodeKind::Binary { op, lhs, rhs })
    }

    pub fn var(&mut self, name: impl Into<String>) -> NodeId {
        self.add(NodeKind::Var(name.into()))
    }

    pub fn name(&mut self, name: impl Into<String>) -> NodeId {
        self.add(NodeKind::Name(name.into()))
    }

    pub fn number(&mut self, text: impl Into<String>) -> NodeId {
        self.add(NodeKind::Number(text.into()))
    }

    pub fn text(&mut self, text: impl Into<String>) -> NodeId {
        self.add(NodeKind::Text(text.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_span() {
        let mut b = AstBuilder::new();
        let id = b.push(NodeKind::Halt, Span::new(2, 4, 4));
        let globals = b.globals(vec![]);
        let procs = b.procedures(vec![]);
        let funcs = b.functions(vec![]);
        let algo = b.algo(vec![id]);
        let main = b.main(vec![], algo);
        let ast = b.finish(
            ProgramBlocks {
                globals,
                procs,
                funcs,
                main,
            },
            Span::new(1, 1, 0),
        );
        assert_eq!(ast.span(id), Span::new(2, 4, 4));
        assert_eq!(ast.span(algo), Span::default());
    }

    #[test]
    fn ids_are_sequential() {
        let mut b = AstBuilder::new();
        let a = b.var("a");
        let c = b.number("3");
        assert_eq!(a.index(), 0);
        assert_eq!(c.index(), 1);
        assert!(b.kind(NodeId::new(9)).is_none());
    }
}
