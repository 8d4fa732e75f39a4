//! End-to-end driver over the compilation phases.
//!
//! Runs, in order, stopping at the first error:
//!
//! 1. [`ScopeResolver`] builds the symbol table
//! 2. [`TypeChecker`] checks operand types and call shapes
//! 3. [`RecursionValidator`] rejects call cycles
//! 4. [`CodeGenerator`] lowers `main` to instructions
//! 5. [`BackendTranslator`] numbers lines and resolves jumps

use spl_core::{Ast, CompilationError};
use tracing::{debug, info_span};

use crate::backend::{BackendTranslator, BasicProgram, DEFAULT_LINE_STEP};
use crate::codegen::{CodeGenerator, Instruction};
use crate::passes::{RecursionValidator, ScopeResolver, TypeChecker};
use crate::symbols::SymbolTable;

/// Options for a compilation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Distance between consecutive BASIC line numbers. Zero means the
    /// default.
    pub line_step: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            line_step: DEFAULT_LINE_STEP,
        }
    }
}

impl CompileOptions {
    pub fn with_line_step(mut self, line_step: u32) -> Self {
        self.line_step = line_step;
        self
    }
}

/// Everything a successful run produces.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub symbols: SymbolTable,
    pub instructions: Vec<Instruction>,
    pub program: BasicProgram,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    options: CompileOptions,
}

impl Pipeline {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&self, ast: &Ast) -> Result<Compilation, CompilationError> {
        let symbols = {
            let span = info_span!("pipeline.resolve", nodes = ast.len());
            let _enter = span.enter();
            let symbols = ScopeResolver::resolve(ast)?;
            debug!(symbols = symbols.len(), "resolved identifiers");
            symbols
        };

        {
            let span = info_span!("pipeline.typecheck");
            let _enter = span.enter();
            TypeChecker::check(ast, &symbols)?;
        }

        {
            let span = info_span!("pipeline.recursion");
            let _enter = span.enter();
            RecursionValidator::validate(ast, &symbols)?;
        }

        let instructions = {
            let span = info_span!("pipeline.codegen");
            let _enter = span.enter();
            let instructions = CodeGenerator::generate(ast, &symbols)?;
            debug!(instructions = instructions.len(), "generated code");
            instructions
        };

        let program = {
            let span = info_span!("pipeline.backend", line_step = self.options.line_step);
            let _enter = span.enter();
            let program =
                BackendTranslator::with_line_step(self.options.line_step).translate(&instructions)?;
            debug!(lines = program.len(), "translated to BASIC");
            program
        };

        Ok(Compilation {
            symbols,
            instructions,
            program,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_core::ErrorCategory;

    fn run(source: &str, options: CompileOptions) -> Result<Compilation, CompilationError> {
        let ast = spl_parser::parse(source).unwrap();
        Pipeline::new(options).run(&ast)
    }

    #[test]
    fn default_options() {
        assert_eq!(CompileOptions::default().line_step, 10);
        assert_eq!(CompileOptions::default().with_line_step(100).line_step, 100);
    }

    #[test]
    fn produces_all_artifacts() {
        let out = run(
            "main { var { x } x = 2; print x }",
            CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(out.instructions.len(), 3);
        assert_eq!(out.program.len(), 3);
        assert_eq!(out.symbols.len(), 3);
        assert_eq!(out.program.to_string(), "10  aa = 2\n20  v1 = aa\n30  PRINT v1");
    }

    #[test]
    fn while_loop_jumps_back_to_condition() {
        let out = run(
            "main { var { x } while (x > 0) { x = (x minus 1) } }",
            CompileOptions::default(),
        )
        .unwrap();
        let lines = out.program.lines();
        let backward: Vec<_> = lines
            .iter()
            .filter_map(|l| {
                let target: u32 = l.text.strip_prefix("GOTO ")?.parse().ok()?;
                (target < l.number).then_some(target)
            })
            .collect();
        assert_eq!(backward.len(), 1);
        let marker = out.program.line(backward[0]).unwrap();
        assert_eq!(marker.text, "REM l0");
        assert_eq!(marker.number, 10);
    }

    #[test]
    fn stops_at_first_failing_phase() {
        let err = run("main { var {} x = 1 }", CompileOptions::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Name);

        let err = run("main { var { x } x = (x > 1) }", CompileOptions::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Type);

        let err = run(
            "proc { p() { local {} p() } } main { var {} p() }",
            CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Recursion);
    }

    #[test]
    fn huge_line_step_is_a_label_error() {
        let err = run(
            "main { var {} halt; halt }",
            CompileOptions::default().with_line_step(u32::MAX),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Label);
    }

    #[test]
    fn zero_line_step_falls_back() {
        let out = run("main { var {} halt }", CompileOptions::default().with_line_step(0)).unwrap();
        assert_eq!(out.program.to_string(), "10  STOP");
    }
}
