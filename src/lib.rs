//! SPL to BASIC compiler.
//!
//! This crate ties the workspace together:
//! - [`spl_parser`] turns source text into an [`Ast`]
//! - [`spl_compiler`] resolves, checks and lowers the tree, then numbers the
//!   BASIC lines
//!
//! # Example
//!
//! ```
//! use spl::Compiler;
//!
//! let source = r#"
//!     main {
//!         var { n }
//!         n = 3;
//!         print n;
//!         halt
//!     }
//! "#;
//!
//! let program = Compiler::new().compile(source).unwrap();
//! assert_eq!(
//!     program.to_string(),
//!     "10  aa = 3\n20  v1 = aa\n30  PRINT v1\n40  STOP"
//! );
//! ```

use tracing::{debug, info_span};

pub use spl_compiler::{
    BackendTranslator, BasicLine, BasicProgram, CodeGenerator, Compilation, CompileOptions,
    Instruction, Pipeline, RecursionValidator, ScopeResolver, SemanticInfo, SymbolTable,
    TypeChecker,
};
pub use spl_core::{
    Ast, AstBuilder, CompilationError, ErrorCategory, LexError, NodeId, NodeKind, ParseError,
    Span, SplError,
};
pub use spl_parser::parse;

/// Compiles SPL programs with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    pipeline: Pipeline,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            pipeline: Pipeline::new(options),
        }
    }

    pub fn options(&self) -> CompileOptions {
        self.pipeline.options()
    }

    /// Compile SPL source text to a numbered BASIC program.
    pub fn compile(&self, source: &str) -> Result<BasicProgram, SplError> {
        Ok(self.compile_full(source)?.program)
    }

    /// Compile SPL source text, keeping the symbol table and the
    /// intermediate instructions.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_full(&self, source: &str) -> Result<Compilation, SplError> {
        let ast = {
            let span = info_span!("pipeline.parse", bytes = source.len());
            let _enter = span.enter();
            let ast = parse(source)?;
            debug!(nodes = ast.len(), "parsed source");
            ast
        };
        Ok(self.pipeline.run(&ast)?)
    }

    /// Compile an already built tree.
    pub fn compile_ast(&self, ast: &Ast) -> Result<BasicProgram, SplError> {
        Ok(self.pipeline.run(ast)?.program)
    }
}

/// Compile SPL source text with default options.
pub fn compile(source: &str) -> Result<BasicProgram, SplError> {
    Compiler::new().compile(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_keep_their_phase() {
        assert!(compile("main { var {} x = 1 $ }").unwrap_err().is_lex());
        assert!(compile("main { var {} halt halt }").unwrap_err().is_parse());
        let err = compile("main { var {} x = 1 }").unwrap_err();
        assert!(err.is_compilation());
        assert_eq!(err.category(), Some(ErrorCategory::Name));
    }

    #[test]
    fn options_are_applied() {
        let compiler = Compiler::with_options(CompileOptions::default().with_line_step(100));
        assert_eq!(compiler.options().line_step, 100);
        let program = compiler.compile("main { var {} halt; halt }").unwrap();
        assert_eq!(program.to_string(), "100 STOP\n200 STOP");
    }

    #[test]
    fn compile_ast_skips_parsing() {
        let ast = parse("main { var {} print 1 }").unwrap();
        let program = Compiler::new().compile_ast(&ast).unwrap();
        assert_eq!(program.to_string(), "10  PRINT 1");
    }

    #[test]
    fn full_compilation_keeps_instructions() {
        let out = Compiler::new().compile_full("main { var { x } x = 1 }").unwrap();
        assert_eq!(out.instructions.len(), 2);
        assert_eq!(out.instructions[1].to_string(), "v1 = aa");
    }
}
