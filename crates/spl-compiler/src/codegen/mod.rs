//! Code generation: lowers a checked tree to [`Instruction`]s.
//!
//! Only the `main` algorithm produces code. Every call is expanded in place:
//! arguments are copied into fresh places, the places are copied into the
//! callee's parameters, and a fresh lowering of the callee's body follows.
//!
//! Terms are lowered into a destination place, with a fresh place for each
//! sub-term. Conditions are lowered to jumping code (see [`condition`]).
//!
//! ## Layouts
//!
//! ```text
//! while            do...until           if                 if...else
//! REM cond         REM start            <cond>             <cond>
//! <cond>           <body>               REM start          REM else
//! REM start        <cond>               <then>             <else>
//! <body>           REM exit             REM exit           GOTO exit
//! GOTO cond                                                REM start
//! REM exit                                                 <then>
//!                                                          REM exit
//! ```
//!
//! Labels for a construct are allocated before its nested code is lowered.
//! For `if...else` both bodies are lowered before the condition.

mod condition;
pub mod instruction;
pub mod labels;
pub mod places;

pub use instruction::{ArithOp, CompareOp, Instruction, Operand, Value};
pub use labels::{Label, LabelAllocator};
pub use places::{PlaceAllocator, RESERVED};

use spl_core::{Ast, CompilationError, NodeId, NodeKind, Type, UnaryOp};
use tracing::trace;

use crate::SymbolTable;
use crate::passes::{DefParts, Result, algo_instrs, body_parts, callee, def_parts, malformed};
use condition::Follow;

pub struct CodeGenerator<'a> {
    ast: &'a Ast,
    symbols: &'a SymbolTable,
    places: PlaceAllocator,
    labels: LabelAllocator,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(ast: &'a Ast, symbols: &'a SymbolTable) -> Self {
        Self {
            ast,
            symbols,
            places: PlaceAllocator::new(),
            labels: LabelAllocator::new(),
        }
    }

    /// Lower the main algorithm of a resolved, checked program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(ast: &'a Ast, symbols: &'a SymbolTable) -> Result<Vec<Instruction>> {
        CodeGenerator::new(ast, symbols).run()
    }

    fn run(mut self) -> Result<Vec<Instruction>> {
        let main = self.ast.blocks().main;
        let NodeKind::Main { algo, .. } = self.ast.kind(main) else {
            return Err(malformed(self.ast, main, "main block"));
        };
        let mut out = Vec::new();
        self.lower_algo(*algo, &mut out)?;
        trace!(
            places = self.places.allocated(),
            instructions = out.len(),
            "lowered main"
        );
        Ok(out)
    }

    // ========================================================================
    // Instructions
    // ========================================================================

    fn lower_algo(&mut self, algo: NodeId, out: &mut Vec<Instruction>) -> Result<()> {
        for &instr in algo_instrs(self.ast, algo)? {
            self.lower_instr(instr, out)?;
        }
        Ok(())
    }

    fn lower_instr(&mut self, instr: NodeId, out: &mut Vec<Instruction>) -> Result<()> {
        let ast = self.ast;
        match ast.kind(instr) {
            NodeKind::Halt => out.push(Instruction::Stop),
            NodeKind::Print { value } => {
                let operand = match ast.kind(*value) {
                    NodeKind::Text(text) => Operand::Text(text.clone()),
                    _ => self.atom(*value)?,
                };
                out.push(Instruction::Print(operand));
            }
            NodeKind::Assign { target, value } => {
                let place = self.places.fresh()?;
                self.lower_term(*value, &place, out)?;
                out.push(Instruction::copy(self.unique_id(*target)?, Operand::Ident(place)));
            }
            NodeKind::Call { name, args } => {
                let parts = self.inline_call(instr, *name, args, out)?;
                if parts.ret.is_some() {
                    return Err(self.wrong_call_kind(instr, *name, "procedure"));
                }
            }
            NodeKind::CallAssign { target, name, args } => {
                let result = self.places.fresh()?;
                let parts = self.inline_call(instr, *name, args, out)?;
                let Some(ret) = parts.ret else {
                    return Err(self.wrong_call_kind(instr, *name, "function"));
                };
                out.push(Instruction::copy(result.clone(), self.atom(ret)?));
                out.push(Instruction::copy(self.unique_id(*target)?, Operand::Ident(result)));
            }
            NodeKind::While { cond, body } => {
                let l_cond = self.labels.fresh();
                let l_start = self.labels.fresh();
                let l_exit = self.labels.fresh();
                out.push(Instruction::Rem(l_cond));
                self.lower_cond(*cond, l_start, l_exit, Follow::Unknown, out)?;
                out.push(Instruction::Rem(l_start));
                self.lower_algo(*body, out)?;
                out.push(Instruction::Goto(l_cond));
                out.push(Instruction::Rem(l_exit));
            }
            NodeKind::DoUntil { body, cond } => {
                let l_start = self.labels.fresh();
                let l_exit = self.labels.fresh();
                out.push(Instruction::Rem(l_start));
                self.lower_algo(*body, out)?;
                self.lower_cond(*cond, l_exit, l_start, Follow::Unknown, out)?;
                out.push(Instruction::Rem(l_exit));
            }
            NodeKind::If { cond, then } => {
                let l_start = self.labels.fresh();
                let l_exit = self.labels.fresh();
                self.lower_cond(*cond, l_start, l_exit, Follow::Unknown, out)?;
                out.push(Instruction::Rem(l_start));
                self.lower_algo(*then, out)?;
                out.push(Instruction::Rem(l_exit));
            }
            NodeKind::IfElse {
                cond,
                then,
                otherwise,
            } => {
                let l_start = self.labels.fresh();
                let l_exit = self.labels.fresh();
                let l_else = self.labels.fresh();
                let mut then_code = Vec::new();
                self.lower_algo(*then, &mut then_code)?;
                let mut else_code = Vec::new();
                self.lower_algo(*otherwise, &mut else_code)?;

                self.lower_cond(*cond, l_start, l_else, Follow::False, out)?;
                out.push(Instruction::Rem(l_else));
                out.append(&mut else_code);
                out.push(Instruction::Goto(l_exit));
                out.push(Instruction::Rem(l_start));
                out.append(&mut then_code);
                out.push(Instruction::Rem(l_exit));
            }
            _ => return Err(malformed(ast, instr, "instruction")),
        }
        Ok(())
    }

    /// Copy arguments into the callee's parameters and splice in its body.
    fn inline_call(
        &mut self,
        instr: NodeId,
        name: NodeId,
        args: &[NodeId],
        out: &mut Vec<Instruction>,
    ) -> Result<DefParts<'a>> {
        let ast = self.ast;
        let def = callee(ast, self.symbols, name)?;
        let parts = def_parts(ast, def)?;
        if parts.params.len() != args.len() {
            return Err(CompilationError::ArityMismatch {
                name: ast.ident(name).unwrap_or_default().to_string(),
                expected: parts.params.len(),
                got: args.len(),
                span: ast.span(instr),
            });
        }

        let mut arg_places = Vec::with_capacity(args.len());
        for &arg in args {
            let place = self.places.fresh()?;
            out.push(Instruction::copy(place.clone(), self.atom(arg)?));
            arg_places.push(place);
        }
        for (&param, place) in parts.params.iter().zip(arg_places) {
            out.push(Instruction::copy(self.unique_id(param)?, Operand::Ident(place)));
        }

        trace!(callee = ast.ident(name).unwrap_or_default(), "inline");
        let (_, body) = body_parts(ast, parts.body)?;
        self.lower_algo(body, out)?;
        Ok(parts)
    }

    fn wrong_call_kind(
        &self,
        instr: NodeId,
        name: NodeId,
        expected: &'static str,
    ) -> CompilationError {
        CompilationError::WrongCallKind {
            name: self.ast.ident(name).unwrap_or_default().to_string(),
            expected,
            span: self.ast.span(instr),
        }
    }

    // ========================================================================
    // Terms
    // ========================================================================

    /// Lower a numeric term so that its value ends up in `place`.
    fn lower_term(
        &mut self,
        term: NodeId,
        place: &str,
        out: &mut Vec<Instruction>,
    ) -> Result<()> {
        let ast = self.ast;
        match ast.kind(term) {
            NodeKind::Var(_) | NodeKind::Number(_) => {
                out.push(Instruction::copy(place, self.atom(term)?));
            }
            NodeKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                let t = self.places.fresh()?;
                self.lower_term(*operand, &t, out)?;
                out.push(Instruction::Assign {
                    target: place.to_string(),
                    value: Value::Negate(t),
                });
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let Some(arith) = ArithOp::from_binary(*op) else {
                    return Err(self.not_numeric(term));
                };
                let t0 = self.places.fresh()?;
                let t1 = self.places.fresh()?;
                self.lower_term(*lhs, &t0, out)?;
                self.lower_term(*rhs, &t1, out)?;
                out.push(Instruction::Assign {
                    target: place.to_string(),
                    value: Value::Arith {
                        lhs: t0,
                        op: arith,
                        rhs: t1,
                    },
                });
            }
            NodeKind::Unary {
                op: UnaryOp::Not, ..
            } => return Err(self.not_numeric(term)),
            _ => return Err(malformed(ast, term, "term")),
        }
        Ok(())
    }

    /// A boolean operator where a number is required.
    fn not_numeric(&self, term: NodeId) -> CompilationError {
        CompilationError::TypeMismatch {
            construct: self.ast.kind(term).tag().to_string(),
            expected: Type::Numeric,
            found: Type::Boolean,
            span: self.ast.span(term),
        }
    }

    fn atom(&self, node: NodeId) -> Result<Operand> {
        match self.ast.kind(node) {
            NodeKind::Var(_) => Ok(Operand::Ident(self.unique_id(node)?)),
            NodeKind::Number(text) => Ok(Operand::Number(text.clone())),
            _ => Err(malformed(self.ast, node, "atom")),
        }
    }

    fn unique_id(&self, node: NodeId) -> Result<String> {
        self.symbols
            .unique_id(node)
            .map(str::to_string)
            .ok_or_else(|| malformed(self.ast, node, "resolved variable"))
    }
}
