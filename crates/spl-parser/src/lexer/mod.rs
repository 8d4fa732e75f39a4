//! Lexical analysis for SPL.

mod cursor;
#[allow(clippy::module_inception)]
mod lexer;
mod token;

pub use lexer::{Lexer, MAX_STRING_LEN};
pub use token::{Token, TokenKind, lookup_keyword};
