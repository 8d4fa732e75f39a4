//! Jumping code for conditions.
//!
//! `lower_cond(node, t, f)` emits code that jumps to `t` when the condition
//! holds and to `f` when it does not:
//!
//! - `not X`: `X` with `t` and `f` swapped
//! - `L and R`: `L` to `(m, f)`, `REM m`, `R` to `(t, f)`
//! - `L or R`: `L` to `(t, m)`, `REM m`, `R` to `(t, f)`
//! - `L eq R`, `L > R`: `IF t1 op t2 THEN t` then `GOTO f`
//!
//! Each comparison is evaluated at most once on any path.
//!
//! When the caller knows which continuation is the code right after the
//! condition, a comparison whose false exit is that code leaves out its
//! `GOTO`. `if...else` uses this to fall into the else-body.

use spl_core::{BinaryOp, CompilationError, NodeId, NodeKind, Type, UnaryOp};

use super::instruction::{CompareOp, Instruction};
use super::labels::Label;
use super::CodeGenerator;
use crate::passes::{Result, malformed};

/// Which continuation starts immediately after the emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Follow {
    /// Not known; every exit jumps.
    Unknown,
    /// The true continuation follows.
    True,
    /// The false continuation follows.
    False,
}

impl Follow {
    fn swapped(self) -> Self {
        match self {
            Follow::Unknown => Follow::Unknown,
            Follow::True => Follow::False,
            Follow::False => Follow::True,
        }
    }

    /// The left operand of `and` is followed by its true continuation.
    fn left_of_and(self) -> Self {
        match self {
            Follow::Unknown => Follow::Unknown,
            _ => Follow::True,
        }
    }

    /// The left operand of `or` is followed by its false continuation.
    fn left_of_or(self) -> Self {
        match self {
            Follow::Unknown => Follow::Unknown,
            _ => Follow::False,
        }
    }
}

impl CodeGenerator<'_> {
    pub(super) fn lower_cond(
        &mut self,
        node: NodeId,
        t: Label,
        f: Label,
        follow: Follow,
        out: &mut Vec<Instruction>,
    ) -> Result<()> {
        let ast = self.ast;
        match ast.kind(node) {
            NodeKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.lower_cond(*operand, f, t, follow.swapped(), out),
            NodeKind::Binary {
                op: BinaryOp::And,
                lhs,
                rhs,
            } => {
                let m = self.labels.fresh();
                self.lower_cond(*lhs, m, f, follow.left_of_and(), out)?;
                out.push(Instruction::Rem(m));
                self.lower_cond(*rhs, t, f, follow, out)
            }
            NodeKind::Binary {
                op: BinaryOp::Or,
                lhs,
                rhs,
            } => {
                let m = self.labels.fresh();
                self.lower_cond(*lhs, t, m, follow.left_of_or(), out)?;
                out.push(Instruction::Rem(m));
                self.lower_cond(*rhs, t, f, follow, out)
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let Some(cmp) = CompareOp::from_binary(*op) else {
                    return Err(self.not_boolean(node));
                };
                let t1 = self.places.fresh()?;
                let t2 = self.places.fresh()?;
                self.lower_term(*lhs, &t1, out)?;
                self.lower_term(*rhs, &t2, out)?;
                out.push(Instruction::IfThen {
                    lhs: t1,
                    op: cmp,
                    rhs: t2,
                    target: t,
                });
                if follow != Follow::False {
                    out.push(Instruction::Goto(f));
                }
                Ok(())
            }
            NodeKind::Unary {
                op: UnaryOp::Neg, ..
            }
            | NodeKind::Var(_)
            | NodeKind::Number(_) => Err(self.not_boolean(node)),
            _ => Err(malformed(ast, node, "condition")),
        }
    }

    /// A numeric term where a condition is required.
    fn not_boolean(&self, node: NodeId) -> CompilationError {
        CompilationError::TypeMismatch {
            construct: self.ast.kind(node).tag().to_string(),
            expected: Type::Boolean,
            found: Type::Numeric,
            span: self.ast.span(node),
        }
    }
}
