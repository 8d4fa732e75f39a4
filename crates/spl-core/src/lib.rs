//! Core types shared by every SPL compilation phase.
//!
//! - [`Span`]: source locations
//! - [`NodeId`], [`Ast`], [`AstBuilder`]: the immutable syntax tree
//! - [`UnaryOp`], [`BinaryOp`]: operators and their BASIC spellings
//! - [`Type`]: the numeric/boolean type lattice
//! - [`error`]: `thiserror` error types for lexing, parsing and compilation

pub mod ast;
pub mod error;
mod ids;
mod ops;
mod span;
mod types;

pub use ast::{Ast, AstBuilder, Node, NodeKind, ProgramBlocks};
pub use error::{
    CompilationError, ErrorCategory, LexError, ParseError, ParseErrorKind, SplError,
};
pub use ids::NodeId;
pub use ops::{BinaryOp, UnaryOp};
pub use span::Span;
pub use types::Type;
