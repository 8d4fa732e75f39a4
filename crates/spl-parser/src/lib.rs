//! SPL parser crate.
//!
//! This crate turns SPL source text into an [`Ast`]:
//! - [`lexer`]: tokenization (identifiers, numbers, short strings, keywords)
//! - [`parser`]: recursive-descent parser for the SPL grammar
//!
//! # Example
//!
//! ```
//! let source = r#"
//!     glob { total }
//!     main {
//!         var { n }
//!         n = 3;
//!         while (n > 0) { total = (total plus n); n = (n minus 1) };
//!         print total
//!     }
//! "#;
//!
//! let ast = spl_parser::parse(source).unwrap();
//! assert_eq!(ast.kind(ast.root()).tag(), "program");
//! ```

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{MAX_ARITY, MAX_NESTING, Parser};

use spl_core::{Ast, SplError};

/// Tokenize and parse a complete SPL program.
pub fn parse(source: &str) -> Result<Ast, SplError> {
    let tokens = Lexer::tokenize(source)?;
    Ok(Parser::new(tokens).parse_program()?)
}
