//! Scope resolution: builds the [`SymbolTable`].
//!
//! One walk over the tree, in this order:
//!
//! ```text
//! enter program
//!   enter glob       declare globals
//!   enter proc       declare every procedure name
//!   enter func       declare every function name
//!     enter <def>    declare params + locals, resolve algo (and return atom)
//!     exit           ... once per definition, procedures first
//!     enter main     declare vars, resolve algo
//!     exit
//!   exit func, proc, glob
//! exit program
//! ```
//!
//! Procedure and function names are declared before any body is walked, so
//! calls may target definitions that appear later. The global, procedure and
//! function scopes stay open for the whole walk, which keeps globals visible
//! in every body.

use spl_core::{Ast, CompilationError, NodeId, NodeKind};
use tracing::trace;

use super::{Result, algo_instrs, body_parts, def_parts, malformed};
use crate::scope::ScopeStack;
use crate::symbols::{ScopeClasses, SemanticInfo, SymbolTable};

pub struct ScopeResolver<'a> {
    ast: &'a Ast,
    stack: ScopeStack,
    table: SymbolTable,
    classes: ScopeClasses,
    next_var: u32,
    next_proc: u32,
    next_func: u32,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        let classes = ScopeClasses::from_blocks(ast.blocks());
        Self {
            ast,
            stack: ScopeStack::new(),
            table: SymbolTable::new(classes),
            classes,
            next_var: 0,
            next_proc: 0,
            next_func: 0,
        }
    }

    /// Resolve every identifier occurrence in `ast`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(ast: &'a Ast) -> Result<SymbolTable> {
        ScopeResolver::new(ast).run()
    }

    fn run(mut self) -> Result<SymbolTable> {
        let ast = self.ast;
        let blocks = ast.blocks();

        self.stack.enter(ast.root());

        self.stack.enter(blocks.globals);
        let NodeKind::Globals { vars } = ast.kind(blocks.globals) else {
            return Err(malformed(ast, blocks.globals, "glob block"));
        };
        for &var in vars {
            self.declare_variable(var)?;
        }

        let procs = match ast.kind(blocks.procs) {
            NodeKind::Procedures { defs } => defs,
            _ => return Err(malformed(ast, blocks.procs, "proc block")),
        };
        self.stack.enter(blocks.procs);
        for &def in procs {
            self.declare_name(def)?;
        }

        let funcs = match ast.kind(blocks.funcs) {
            NodeKind::Functions { defs } => defs,
            _ => return Err(malformed(ast, blocks.funcs, "func block")),
        };
        self.stack.enter(blocks.funcs);
        for &def in funcs {
            self.declare_name(def)?;
        }

        for &def in procs.iter().chain(funcs) {
            self.resolve_definition(def)?;
        }
        self.resolve_main(blocks.main)?;

        for _ in 0..4 {
            self.stack.exit();
        }
        debug_assert!(self.stack.is_empty());

        Ok(self.table)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Declare a variable (global, `var`, `local` or parameter).
    ///
    /// Rejected when a visible binding of the same name lives in the current
    /// scope, or names a procedure or function.
    fn declare_variable(&mut self, id: NodeId) -> Result<()> {
        let ast = self.ast;
        let NodeKind::Var(name) = ast.kind(id) else {
            return Err(malformed(ast, id, "variable declaration"));
        };

        let current = self.stack.current();
        let clash = self
            .stack
            .visible(name)
            .find(|b| Some(b.scope) == current || self.classes.is_callable(b.scope));
        if let Some(previous) = clash {
            return Err(CompilationError::Redeclaration {
                name: name.clone(),
                previous: ast.span(previous.decl),
                span: ast.span(id),
            });
        }

        self.next_var += 1;
        let unique_id = format!("v{}", self.next_var);
        self.bind(id, name, unique_id)
    }

    /// Declare the name of a procedure or function definition.
    ///
    /// Rejected when a visible binding of the same name is a global, a
    /// procedure or a function.
    fn declare_name(&mut self, def: NodeId) -> Result<()> {
        let ast = self.ast;
        let parts = def_parts(ast, def)?;
        let NodeKind::Name(name) = ast.kind(parts.name) else {
            return Err(malformed(ast, parts.name, "procedure or function name"));
        };

        let clash = self.stack.visible(name).find(|b| {
            b.scope == self.classes.global || self.classes.is_callable(b.scope)
        });
        if let Some(previous) = clash {
            return Err(CompilationError::Redeclaration {
                name: name.clone(),
                previous: ast.span(previous.decl),
                span: ast.span(parts.name),
            });
        }

        let unique_id = if parts.ret.is_some() {
            self.next_func += 1;
            format!("f{}", self.next_func)
        } else {
            self.next_proc += 1;
            format!("p{}", self.next_proc)
        };
        self.bind(parts.name, name, unique_id)?;
        self.table.insert_definition(parts.name, def);
        Ok(())
    }

    fn bind(&mut self, id: NodeId, name: &str, unique_id: String) -> Result<()> {
        let scope = self
            .stack
            .bind(name, id)
            .ok_or_else(|| malformed(self.ast, id, "declaration inside a scope"))?;
        trace!(name, unique_id = %unique_id, scope = scope.as_u32(), "declared");
        self.table.insert(
            id,
            SemanticInfo {
                symbol_name: name.to_string(),
                scope_level: scope,
                declaration_node: id,
                unique_id,
            },
        );
        Ok(())
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    fn resolve_definition(&mut self, def: NodeId) -> Result<()> {
        let ast = self.ast;
        let parts = def_parts(ast, def)?;
        let (locals, algo) = body_parts(ast, parts.body)?;

        self.stack.enter(def);
        for &param in parts.params {
            self.declare_variable(param)?;
        }
        for &local in locals {
            self.declare_variable(local)?;
        }
        self.resolve_algo(algo)?;
        if let Some(ret) = parts.ret {
            self.resolve_term(ret)?;
        }
        self.stack.exit();
        Ok(())
    }

    fn resolve_main(&mut self, main: NodeId) -> Result<()> {
        let ast = self.ast;
        let NodeKind::Main { vars, algo } = ast.kind(main) else {
            return Err(malformed(ast, main, "main block"));
        };

        self.stack.enter(main);
        for &var in vars {
            self.declare_variable(var)?;
        }
        self.resolve_algo(*algo)?;
        self.stack.exit();
        Ok(())
    }

    fn resolve_algo(&mut self, algo: NodeId) -> Result<()> {
        for &instr in algo_instrs(self.ast, algo)? {
            self.resolve_instr(instr)?;
        }
        Ok(())
    }

    fn resolve_instr(&mut self, instr: NodeId) -> Result<()> {
        let ast = self.ast;
        match ast.kind(instr) {
            NodeKind::Halt => Ok(()),
            NodeKind::Print { value } => match ast.kind(*value) {
                NodeKind::Text(_) => Ok(()),
                _ => self.resolve_term(*value),
            },
            NodeKind::Call { name, args } => {
                self.use_name(*name)?;
                self.resolve_terms(args)
            }
            NodeKind::Assign { target, value } => {
                self.use_variable(*target)?;
                self.resolve_term(*value)
            }
            NodeKind::CallAssign { target, name, args } => {
                self.use_variable(*target)?;
                self.use_name(*name)?;
                self.resolve_terms(args)
            }
            NodeKind::While { cond, body } | NodeKind::If { cond, then: body } => {
                self.resolve_term(*cond)?;
                self.resolve_algo(*body)
            }
            NodeKind::DoUntil { body, cond } => {
                self.resolve_algo(*body)?;
                self.resolve_term(*cond)
            }
            NodeKind::IfElse {
                cond,
                then,
                otherwise,
            } => {
                self.resolve_term(*cond)?;
                self.resolve_algo(*then)?;
                self.resolve_algo(*otherwise)
            }
            _ => Err(malformed(ast, instr, "instruction")),
        }
    }

    fn resolve_terms(&mut self, terms: &[NodeId]) -> Result<()> {
        for &term in terms {
            self.resolve_term(term)?;
        }
        Ok(())
    }

    fn resolve_term(&mut self, term: NodeId) -> Result<()> {
        let ast = self.ast;
        match ast.kind(term) {
            NodeKind::Var(_) => self.use_variable(term),
            NodeKind::Number(_) => Ok(()),
            NodeKind::Unary { operand, .. } => self.resolve_term(*operand),
            NodeKind::Binary { lhs, rhs, .. } => {
                self.resolve_term(*lhs)?;
                self.resolve_term(*rhs)
            }
            _ => Err(malformed(ast, term, "term")),
        }
    }

    // ========================================================================
    // Uses
    // ========================================================================

    /// Resolve a variable occurrence to its declaration.
    fn use_variable(&mut self, id: NodeId) -> Result<()> {
        let ast = self.ast;
        let NodeKind::Var(name) = ast.kind(id) else {
            return Err(malformed(ast, id, "variable"));
        };
        let Some(binding) = self.stack.lookup(name) else {
            return Err(CompilationError::UndeclaredVariable {
                name: name.clone(),
                span: ast.span(id),
            });
        };
        if self.classes.is_callable(binding.scope) {
            return Err(CompilationError::NotAVariable {
                name: name.clone(),
                span: ast.span(id),
            });
        }
        self.copy_declaration(id, binding.decl)
    }

    /// Resolve a call target to a procedure or function name.
    fn use_name(&mut self, id: NodeId) -> Result<()> {
        let ast = self.ast;
        let NodeKind::Name(name) = ast.kind(id) else {
            return Err(malformed(ast, id, "procedure or function name"));
        };
        let Some(binding) = self.stack.lookup(name) else {
            return Err(CompilationError::UndeclaredName {
                name: name.clone(),
                span: ast.span(id),
            });
        };
        if !self.classes.is_callable(binding.scope) {
            return Err(CompilationError::NotCallable {
                name: name.clone(),
                span: ast.span(id),
            });
        }
        self.copy_declaration(id, binding.decl)
    }

    fn copy_declaration(&mut self, id: NodeId, decl: NodeId) -> Result<()> {
        let info = self
            .table
            .get(decl)
            .cloned()
            .ok_or_else(|| malformed(self.ast, decl, "declaration"))?;
        self.table.insert(id, info);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::ScopeClass;
    use spl_core::{AstBuilder, ErrorCategory, ProgramBlocks, Span};

    fn resolve(source: &str) -> Result<(Ast, SymbolTable)> {
        let ast = spl_parser::parse(source).unwrap();
        let table = ScopeResolver::resolve(&ast)?;
        Ok((ast, table))
    }

    fn resolve_err(source: &str) -> CompilationError {
        match resolve(source) {
            Err(e) => e,
            Ok(_) => panic!("expected resolution to fail"),
        }
    }

    /// Ids of all `Var` nodes named `name`, in source order.
    fn vars_named(ast: &Ast, name: &str) -> Vec<NodeId> {
        ast.iter()
            .filter(|n| matches!(&n.kind, NodeKind::Var(v) if v == name))
            .map(|n| n.id)
            .collect()
    }

    #[test]
    fn every_occurrence_gets_an_entry() {
        let (ast, table) = resolve("main { var { x } x = (x plus 1); print x }").unwrap();
        let xs = vars_named(&ast, "x");
        assert_eq!(xs.len(), 4);
        for id in &xs {
            let info = table.get(*id).unwrap();
            assert_eq!(info.declaration_node, xs[0]);
            assert_eq!(info.unique_id, "v1");
            assert_eq!(info.scope_level, ast.blocks().main);
        }
    }

    #[test]
    fn uses_point_at_declarations() {
        let (ast, table) = resolve(
            "glob { g }
             proc { p(a) { local { b } b = (a plus g) } }
             main { var { m } p(m); g = m }",
        )
        .unwrap();
        for (id, info) in table.iter() {
            let decl = info.declaration_node;
            let decl_info = table.get(decl).unwrap();
            assert_eq!(decl_info.declaration_node, decl, "for {id}");
            assert!(matches!(
                ast.kind(decl),
                NodeKind::Var(_) | NodeKind::Name(_)
            ));
        }
    }

    #[test]
    fn globals_visible_in_every_body() {
        let (ast, table) = resolve(
            "glob { g }
             proc { p() { local {} g = 1 } q() { local {} print g } }
             func { f() { local {} g = 2; return g } }
             main { var {} g = 3 }",
        )
        .unwrap();
        let gs = vars_named(&ast, "g");
        assert_eq!(gs.len(), 6);
        for id in gs {
            let info = table.get(id).unwrap();
            assert_eq!(info.unique_id, "v1");
            assert_eq!(table.class_of(id), Some(ScopeClass::Global));
        }
    }

    #[test]
    fn calls_may_target_later_definitions() {
        let (ast, table) = resolve(
            "proc { a() { local {} b() } b() { local {} halt } }
             main { var {} a() }",
        )
        .unwrap();
        let call_targets: Vec<_> = ast
            .iter()
            .filter(|n| matches!(&n.kind, NodeKind::Name(s) if s == "b"))
            .map(|n| n.id)
            .collect();
        assert_eq!(call_targets.len(), 2);
        let def_b = ast.children(ast.blocks().procs)[1];
        for id in call_targets {
            assert_eq!(table.definition_of(id), Some(def_b));
        }
    }

    #[test]
    fn unique_ids_per_declaration() {
        let (ast, table) = resolve(
            "glob { x }
             proc { p(x) { local {} halt } }
             func { f(x) { local {} return x } }
             main { var { x } halt }",
        )
        .unwrap();
        let ids: Vec<_> = vars_named(&ast, "x")
            .into_iter()
            .map(|id| table.unique_id(id).unwrap().to_string())
            .collect();
        // glob x, param of p, param of f, return use of f's x, main x
        assert_eq!(ids, vec!["v1", "v2", "v3", "v3", "v4"]);

        let names: Vec<_> = ast
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Name(_)))
            .map(|n| table.unique_id(n.id).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["p1", "f1"]);
    }

    #[test]
    fn same_name_in_sibling_blocks_is_fine() {
        assert!(
            resolve(
                "proc { p(a) { local { t } halt } q(a) { local { t } halt } }
                 main { var { t } halt }"
            )
            .is_ok()
        );
    }

    #[test]
    fn local_may_shadow_global() {
        let (ast, table) = resolve("glob { x } main { var { x } x = 1 }").unwrap();
        let xs = vars_named(&ast, "x");
        assert_eq!(table.unique_id(xs[2]), Some("v2"));
    }

    #[test]
    fn redeclaration_in_same_block() {
        let err = resolve_err("main { var { x x } halt }");
        assert!(matches!(err, CompilationError::Redeclaration { ref name, .. } if name == "x"));
        assert_eq!(err.category(), ErrorCategory::Name);
    }

    #[test]
    fn param_and_local_share_a_scope() {
        let err = resolve_err("proc { p(a) { local { a } halt } } main { var {} halt }");
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
    }

    #[test]
    fn duplicate_global() {
        let err = resolve_err("glob { g g } main { var {} halt }");
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
    }

    #[test]
    fn variable_named_like_procedure() {
        let err = resolve_err("proc { p() { local {} halt } } main { var { p } halt }");
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
    }

    #[test]
    fn procedure_named_like_global() {
        let err = resolve_err("glob { p } proc { p() { local {} halt } } main { var {} halt }");
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
    }

    #[test]
    fn procedure_and_function_share_a_name() {
        let err = resolve_err(
            "proc { f() { local {} halt } } func { f() { local {} return 1 } } main { var {} halt }",
        );
        assert!(matches!(err, CompilationError::Redeclaration { .. }));
    }

    #[test]
    fn undeclared_variable() {
        let err = resolve_err("main { var {} x = 1 }");
        assert_eq!(
            err,
            CompilationError::UndeclaredVariable {
                name: "x".into(),
                span: Span::new(1, 15, 1)
            }
        );
    }

    #[test]
    fn locals_do_not_leak_into_main() {
        let err = resolve_err("proc { p() { local { t } halt } } main { var {} t = 1 }");
        assert!(matches!(err, CompilationError::UndeclaredVariable { .. }));
    }

    #[test]
    fn procedure_name_used_as_variable() {
        let err = resolve_err("proc { p() { local {} halt } } main { var {} print p }");
        assert!(matches!(err, CompilationError::NotAVariable { .. }));
    }

    #[test]
    fn variable_used_as_call_target() {
        let err = resolve_err("main { var { x } x() }");
        assert!(matches!(err, CompilationError::NotCallable { .. }));
    }

    #[test]
    fn undeclared_call_target() {
        let err = resolve_err("main { var {} nothing() }");
        assert!(matches!(err, CompilationError::UndeclaredName { .. }));
    }

    #[test]
    fn malformed_tree_is_reported() {
        let mut b = AstBuilder::new();
        let globals = b.globals(vec![]);
        let procs = b.procedures(vec![]);
        let funcs = b.functions(vec![]);
        let halt = b.halt();
        // an instruction where a term is required
        let bad = b.assign(halt, halt);
        let algo = b.algo(vec![bad]);
        let main = b.main(vec![], algo);
        let ast = b.finish(
            ProgramBlocks {
                globals,
                procs,
                funcs,
                main,
            },
            Span::default(),
        );
        let err = ScopeResolver::resolve(&ast).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Malformed);
    }
}
