//! Recursion validation.
//!
//! Every call is inlined during code generation, so the call graph must be
//! acyclic. Each definition is explored depth-first, following calls in
//! nested loop and branch bodies as well. A call to a definition already on
//! the current path is a cycle.
//!
//! Definitions whose exploration finished without finding a cycle are
//! remembered and not explored again. Such a definition cannot reach any
//! definition that reaches it, so skipping it never hides a cycle.

use rustc_hash::FxHashSet;
use spl_core::{Ast, CompilationError, NodeId, NodeKind};
use tracing::trace;

use super::{Result, algo_instrs, all_definitions, body_parts, callee, def_parts};
use crate::SymbolTable;

pub struct RecursionValidator<'a> {
    ast: &'a Ast,
    symbols: &'a SymbolTable,
    /// Definitions proven not to reach themselves.
    acyclic: FxHashSet<NodeId>,
    /// Definitions currently being expanded, outermost first.
    path: Vec<NodeId>,
}

impl<'a> RecursionValidator<'a> {
    pub fn new(ast: &'a Ast, symbols: &'a SymbolTable) -> Self {
        Self {
            ast,
            symbols,
            acyclic: FxHashSet::default(),
            path: Vec::new(),
        }
    }

    /// Reject any procedure or function that can reach itself through calls.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn validate(ast: &'a Ast, symbols: &'a SymbolTable) -> Result<()> {
        let mut validator = RecursionValidator::new(ast, symbols);
        for def in all_definitions(ast)? {
            validator.visit(def)?;
        }
        Ok(())
    }

    fn visit(&mut self, def: NodeId) -> Result<()> {
        if self.acyclic.contains(&def) {
            return Ok(());
        }
        let parts = def_parts(self.ast, def)?;
        let (_, algo) = body_parts(self.ast, parts.body)?;

        self.path.push(def);
        self.walk_algo(algo)?;
        self.path.pop();
        self.acyclic.insert(def);
        Ok(())
    }

    fn walk_algo(&mut self, algo: NodeId) -> Result<()> {
        let ast = self.ast;
        for &instr in algo_instrs(ast, algo)? {
            match ast.kind(instr) {
                NodeKind::Call { name, .. } | NodeKind::CallAssign { name, .. } => {
                    self.follow_call(instr, *name)?;
                }
                NodeKind::While { body, .. }
                | NodeKind::DoUntil { body, .. }
                | NodeKind::If { then: body, .. } => self.walk_algo(*body)?,
                NodeKind::IfElse {
                    then, otherwise, ..
                } => {
                    self.walk_algo(*then)?;
                    self.walk_algo(*otherwise)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn follow_call(&mut self, instr: NodeId, name: NodeId) -> Result<()> {
        let target = callee(self.ast, self.symbols, name)?;
        if let Some(start) = self.path.iter().position(|&d| d == target) {
            let mut chain = self.path[start..]
                .iter()
                .map(|&d| self.def_name(d))
                .collect::<Vec<_>>();
            chain.push(self.def_name(target));
            return Err(CompilationError::Recursion {
                chain,
                span: self.ast.span(instr),
            });
        }
        let caller = self.path.last().map(|&d| self.def_name(d));
        trace!(caller = ?caller, callee = %self.def_name(target), "follow call");
        self.visit(target)
    }

    fn def_name(&self, def: NodeId) -> String {
        def_parts(self.ast, def)
            .ok()
            .and_then(|parts| self.ast.ident(parts.name))
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::ScopeResolver;
    use spl_core::ErrorCategory;

    fn validate(source: &str) -> Result<()> {
        let ast = spl_parser::parse(source).unwrap();
        let symbols = ScopeResolver::resolve(&ast).unwrap();
        RecursionValidator::validate(&ast, &symbols)
    }

    fn chain_of(err: CompilationError) -> Vec<String> {
        match err {
            CompilationError::Recursion { chain, .. } => chain,
            other => panic!("expected a recursion error, got {other:?}"),
        }
    }

    #[test]
    fn program_without_calls() {
        assert!(validate("main { var { x } x = 1; print x }").is_ok());
    }

    #[test]
    fn call_chain_without_cycle() {
        assert!(
            validate(
                "proc { a() { local {} b() } b() { local {} c() } c() { local {} halt } }
                 main { var {} a() }"
            )
            .is_ok()
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        assert!(
            validate(
                "proc {
                   top() { local {} left(); right() }
                   left() { local {} bottom() }
                   right() { local {} bottom() }
                   bottom() { local {} halt }
                 }
                 main { var {} top() }"
            )
            .is_ok()
        );
    }

    #[test]
    fn direct_recursion() {
        let err = validate("proc { p() { local {} p() } } main { var {} halt }").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Recursion);
        assert_eq!(chain_of(err), vec!["p", "p"]);
    }

    #[test]
    fn mutual_recursion_through_functions() {
        let err = validate(
            "func {
               f(n) { local { r } r = g(n); return r }
               g(n) { local { r } r = f(n); return r }
             }
             main { var { x } x = f(1) }",
        )
        .unwrap_err();
        assert_eq!(chain_of(err), vec!["f", "g", "f"]);
    }

    #[test]
    fn cycle_hidden_in_nested_body() {
        let err = validate(
            "proc {
               p(n) { local {} if (n > 0) { while (n > 1) { q(n) } } else { halt } }
               q(n) { local {} do { p(n) } until (n eq 0) }
             }
             main { var {} p(3) }",
        )
        .unwrap_err();
        assert_eq!(chain_of(err), vec!["p", "q", "p"]);
    }

    #[test]
    fn chain_starts_at_the_cycle() {
        let err = validate(
            "proc {
               entry() { local {} a() }
               a() { local {} b() }
               b() { local {} a() }
             }
             main { var {} entry() }",
        )
        .unwrap_err();
        assert_eq!(chain_of(err), vec!["a", "b", "a"]);
    }

    #[test]
    fn mixed_procedure_and_function_cycle() {
        let err = validate(
            "proc { p() { local { x } x = f() } }
             func { f() { local {} p(); return 1 } }
             main { var {} p() }",
        )
        .unwrap_err();
        assert_eq!(chain_of(err), vec!["p", "f", "p"]);
    }
}
