//! Type checking.
//!
//! SPL has two value types. Atoms are numeric; `eq` and `>` compare numbers
//! and produce a comparison, which the enclosing construct treats as boolean.
//!
//! | construct               | operands | result     |
//! |-------------------------|----------|------------|
//! | `neg`                   | numeric  | numeric    |
//! | `not`                   | boolean  | boolean    |
//! | `eq`, `>`               | numeric  | comparison |
//! | `and`, `or`             | boolean  | boolean    |
//! | `plus` `minus` `mult` `div` | numeric | numeric |
//!
//! Conditions must be boolean; assignment sources, call arguments and
//! return atoms must be numeric. Calls are also checked for kind (a call
//! instruction names a procedure, a call-assignment names a function) and
//! arity.

use spl_core::{Ast, BinaryOp, CompilationError, NodeId, NodeKind, Type, UnaryOp};

use super::{Result, algo_instrs, all_definitions, body_parts, callee, def_parts, malformed};
use crate::SymbolTable;

pub struct TypeChecker<'a> {
    ast: &'a Ast,
    symbols: &'a SymbolTable,
}

impl<'a> TypeChecker<'a> {
    pub fn new(ast: &'a Ast, symbols: &'a SymbolTable) -> Self {
        Self { ast, symbols }
    }

    /// Check every definition and the main program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check(ast: &'a Ast, symbols: &'a SymbolTable) -> Result<()> {
        TypeChecker::new(ast, symbols).run()
    }

    fn run(&self) -> Result<()> {
        let ast = self.ast;
        for def in all_definitions(ast)? {
            let parts = def_parts(ast, def)?;
            let (_, algo) = body_parts(ast, parts.body)?;
            self.check_algo(algo)?;
            if let Some(ret) = parts.ret {
                self.expect_term("return", ret, Type::Numeric)?;
            }
        }

        let main = ast.blocks().main;
        match ast.kind(main) {
            NodeKind::Main { algo, .. } => self.check_algo(*algo),
            _ => Err(malformed(ast, main, "main block")),
        }
    }

    // ========================================================================
    // Instructions
    // ========================================================================

    fn check_algo(&self, algo: NodeId) -> Result<()> {
        for &instr in algo_instrs(self.ast, algo)? {
            self.check_instr(instr)?;
        }
        Ok(())
    }

    fn check_instr(&self, instr: NodeId) -> Result<()> {
        let ast = self.ast;
        let kind = ast.kind(instr);
        match kind {
            NodeKind::Halt => Ok(()),
            NodeKind::Print { value } => match ast.kind(*value) {
                NodeKind::Text(_) | NodeKind::Var(_) | NodeKind::Number(_) => Ok(()),
                _ => Err(malformed(ast, *value, "atom or string")),
            },
            NodeKind::Assign { target, value } => {
                self.check_target(*target)?;
                self.expect_term(kind.tag(), *value, Type::Numeric)
            }
            NodeKind::Call { name, args } => self.check_call(instr, *name, args, false),
            NodeKind::CallAssign { target, name, args } => {
                self.check_target(*target)?;
                self.check_call(instr, *name, args, true)
            }
            NodeKind::While { cond, body } | NodeKind::If { cond, then: body } => {
                self.expect_term(kind.tag(), *cond, Type::Boolean)?;
                self.check_algo(*body)
            }
            NodeKind::DoUntil { body, cond } => {
                self.check_algo(*body)?;
                self.expect_term(kind.tag(), *cond, Type::Boolean)
            }
            NodeKind::IfElse {
                cond,
                then,
                otherwise,
            } => {
                self.expect_term(kind.tag(), *cond, Type::Boolean)?;
                self.check_algo(*then)?;
                self.check_algo(*otherwise)
            }
            _ => Err(malformed(ast, instr, "instruction")),
        }
    }

    /// Assignment targets are variables, which are always numeric.
    fn check_target(&self, target: NodeId) -> Result<()> {
        match self.ast.kind(target) {
            NodeKind::Var(_) => Ok(()),
            _ => Err(malformed(self.ast, target, "variable")),
        }
    }

    fn check_call(
        &self,
        instr: NodeId,
        name: NodeId,
        args: &[NodeId],
        wants_value: bool,
    ) -> Result<()> {
        let ast = self.ast;
        let def = callee(ast, self.symbols, name)?;
        let parts = def_parts(ast, def)?;
        let ident = ast.ident(name).unwrap_or_default();
        let span = ast.span(instr);

        if parts.ret.is_some() != wants_value {
            return Err(CompilationError::WrongCallKind {
                name: ident.to_string(),
                expected: if wants_value { "function" } else { "procedure" },
                span,
            });
        }
        if parts.params.len() != args.len() {
            return Err(CompilationError::ArityMismatch {
                name: ident.to_string(),
                expected: parts.params.len(),
                got: args.len(),
                span,
            });
        }
        for &arg in args {
            self.expect_term("call", arg, Type::Numeric)?;
        }
        Ok(())
    }

    // ========================================================================
    // Terms
    // ========================================================================

    /// Require `term` to have type `expected` as an operand of `construct`.
    fn expect_term(&self, construct: &str, term: NodeId, expected: Type) -> Result<()> {
        let found = self.type_of(term)?.settle();
        if found == expected {
            Ok(())
        } else {
            Err(CompilationError::TypeMismatch {
                construct: construct.to_string(),
                expected,
                found,
                span: self.ast.span(term),
            })
        }
    }

    /// The type of a term, before settling.
    pub fn type_of(&self, term: NodeId) -> Result<Type> {
        let ast = self.ast;
        match ast.kind(term) {
            NodeKind::Var(_) | NodeKind::Number(_) => Ok(Type::Numeric),
            NodeKind::Unary { op, operand } => {
                let ty = match op {
                    UnaryOp::Neg => Type::Numeric,
                    UnaryOp::Not => Type::Boolean,
                };
                self.expect_term(op.as_str(), *operand, ty)?;
                Ok(ty)
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let (operands, result) = binary_signature(*op);
                self.expect_term(op.as_str(), *lhs, operands)?;
                self.expect_term(op.as_str(), *rhs, operands)?;
                Ok(result)
            }
            _ => Err(malformed(ast, term, "term")),
        }
    }
}

/// Operand and result type of a binary operator.
fn binary_signature(op: BinaryOp) -> (Type, Type) {
    if op.is_comparison() {
        (Type::Numeric, Type::Comparison)
    } else if op.is_logical() {
        (Type::Boolean, Type::Boolean)
    } else {
        (Type::Numeric, Type::Numeric)
    }
}
