//! SPL Compiler
//!
//! Semantic analysis and code generation for SPL, producing line-numbered
//! BASIC.
//!
//! ## Phases
//!
//! - **Scope resolution**: bind every identifier occurrence to its declaration
//! - **Type checking**: numeric/boolean typing, call kind and arity
//! - **Recursion validation**: reject call cycles so calls can be inlined
//! - **Code generation**: inline calls, lower terms into places and
//!   conditions into jumping code
//! - **Backend translation**: number lines and resolve jump targets
//!
//! ## Modules
//!
//! - [`scope`]: scope stack used during resolution
//! - [`symbols`]: the symbol table produced by resolution
//! - [`passes`]: the three analysis passes
//! - [`codegen`]: instruction set, place/label allocators and the generator
//! - [`backend`]: label resolution and BASIC output
//! - [`pipeline`]: runs every phase in order

pub mod backend;
pub mod codegen;
pub mod passes;
pub mod pipeline;
pub mod scope;
pub mod symbols;

pub use backend::{BackendTranslator, BasicLine, BasicProgram, DEFAULT_LINE_STEP};
pub use codegen::{CodeGenerator, Instruction, Label, Operand, Value};
pub use passes::{RecursionValidator, ScopeResolver, TypeChecker};
pub use pipeline::{Compilation, CompileOptions, Pipeline};
pub use scope::{Binding, ScopeStack};
pub use symbols::{ScopeClass, ScopeClasses, SemanticInfo, SymbolTable};

pub use spl_core::CompilationError;
