//! Token types for the SPL lexer.

use spl_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme borrows from the source text. For string literals it
/// includes the surrounding quotes.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All SPL token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals and identifiers
    // =========================================
    /// `[a-z][a-z]*[0-9]*` that is not a keyword
    Identifier,
    /// `0 | [1-9][0-9]*`
    Number,
    /// `"..."`, at most 15 characters
    Text,

    // =========================================
    // Keywords - program structure
    // =========================================
    Glob,
    Proc,
    Func,
    Main,
    Var,
    Local,
    Return,

    // =========================================
    // Keywords - instructions
    // =========================================
    Halt,
    Print,
    While,
    Do,
    Until,
    If,
    Else,

    // =========================================
    // Keywords - operators
    // =========================================
    Eq,
    Or,
    And,
    Plus,
    Minus,
    Mult,
    Div,
    Neg,
    Not,

    // =========================================
    // Punctuation
    // =========================================
    /// `=`
    Assign,
    /// `>`
    Greater,
    /// `;`
    Semicolon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    Eof,
}

impl TokenKind {
    /// Whether this token is one of the binary operators.
    pub fn is_binary_op(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Greater
                | TokenKind::Or
                | TokenKind::And
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Mult
                | TokenKind::Div
        )
    }

    /// Whether this token is one of the unary operators.
    pub fn is_unary_op(self) -> bool {
        matches!(self, TokenKind::Neg | TokenKind::Not)
    }

    pub fn description(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Text => "string",
            TokenKind::Glob => "'glob'",
            TokenKind::Proc => "'proc'",
            TokenKind::Func => "'func'",
            TokenKind::Main => "'main'",
            TokenKind::Var => "'var'",
            TokenKind::Local => "'local'",
            TokenKind::Return => "'return'",
            TokenKind::Halt => "'halt'",
            TokenKind::Print => "'print'",
            TokenKind::While => "'while'",
            TokenKind::Do => "'do'",
            TokenKind::Until => "'until'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Eq => "'eq'",
            TokenKind::Or => "'or'",
            TokenKind::And => "'and'",
            TokenKind::Plus => "'plus'",
            TokenKind::Minus => "'minus'",
            TokenKind::Mult => "'mult'",
            TokenKind::Div => "'div'",
            TokenKind::Neg => "'neg'",
            TokenKind::Not => "'not'",
            TokenKind::Assign => "'='",
            TokenKind::Greater => "'>'",
            TokenKind::Semicolon => "';'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Look up a keyword, returning `None` for plain identifiers.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "glob" => TokenKind::Glob,
        "proc" => TokenKind::Proc,
        "func" => TokenKind::Func,
        "main" => TokenKind::Main,
        "var" => TokenKind::Var,
        "local" => TokenKind::Local,
        "return" => TokenKind::Return,
        "halt" => TokenKind::Halt,
        "print" => TokenKind::Print,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "until" => TokenKind::Until,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "eq" => TokenKind::Eq,
        "or" => TokenKind::Or,
        "and" => TokenKind::And,
        "plus" => TokenKind::Plus,
        "minus" => TokenKind::Minus,
        "mult" => TokenKind::Mult,
        "div" => TokenKind::Div,
        "neg" => TokenKind::Neg,
        "not" => TokenKind::Not,
        _ => return None,
    };
    Some(kind)
}
