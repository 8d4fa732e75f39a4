//! Error types for every phase of SPL compilation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! SplError (top-level wrapper)
//! ├── LexError          - tokenization errors
//! ├── ParseError        - grammar errors (with ParseErrorKind)
//! └── CompilationError  - scope, type, recursion, generation and label errors
//! ```
//!
//! `CompilationError` is shared by all semantic phases. Its
//! [`category`](CompilationError::category) tells which class of failure
//! occurred. The first error aborts its phase; nothing partial flows on.

use thiserror::Error;

use crate::{Span, Type};

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during tokenization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that starts no SPL token.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not closed on its line.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A string literal longer than the language allows.
    #[error("string literal at {span} is {len} characters long (at most {max} allowed)")]
    StringTooLong { len: usize, max: usize, span: Span },

    /// A numeric literal with a leading zero, or digits glued to letters.
    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::StringTooLong { span, .. } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// A term was expected.
    ExpectedTerm,
    /// An instruction was expected.
    ExpectedInstruction,
    /// Too many parameters, locals or arguments, or nesting too deep.
    TooMany,
    /// Input continues after the `main` block.
    TrailingInput,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedTerm => "expected term",
            ParseErrorKind::ExpectedInstruction => "expected instruction",
            ParseErrorKind::TooMany => "too many items",
            ParseErrorKind::TrailingInput => "trailing input",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Format the error with the offending source line and a caret.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = format!("Error at {}: {}\n", self.span, self.kind);
        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        let line_text = (self.span.line as usize)
            .checked_sub(1)
            .and_then(|n| source.lines().nth(n));
        if let Some(line_text) = line_text {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", self.span.line, line_text));
            let indent = " ".repeat(self.span.col.saturating_sub(1) as usize);
            let pointer = "^".to_string() + &"~".repeat(self.span.len.saturating_sub(1) as usize);
            output.push_str(&format!("  | {indent}{pointer}\n"));
        }

        output
    }
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// The class of a [`CompilationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Scope and declaration rule violations.
    Name,
    /// Typing violations, including wrong call kind and arity.
    Type,
    /// A procedure or function can reach itself through calls.
    Recursion,
    /// The generator ran out of two-letter place names.
    NamespaceExhausted,
    /// A jump target has no marker, or a marker appears twice.
    Label,
    /// A hand-built tree puts a node where its kind is not allowed.
    Malformed,
}

/// Errors raised by the semantic and generation phases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name declared twice where the scope rules forbid it.
    #[error("at {span}: '{name}' redeclared (previously declared at {previous})")]
    Redeclaration {
        name: String,
        previous: Span,
        span: Span,
    },

    /// A variable used without a reachable declaration.
    #[error("at {span}: undeclared variable '{name}'")]
    UndeclaredVariable { name: String, span: Span },

    /// A call to a procedure or function that is not declared.
    #[error("at {span}: undeclared procedure or function '{name}'")]
    UndeclaredName { name: String, span: Span },

    /// A procedure or function name used where a variable is required.
    #[error("at {span}: '{name}' is a procedure or function, not a variable")]
    NotAVariable { name: String, span: Span },

    /// A variable used as a call target.
    #[error("at {span}: '{name}' is a variable and cannot be called")]
    NotCallable { name: String, span: Span },

    /// A construct received an operand of the wrong type.
    #[error("at {span}: '{construct}' expects {expected}, found {found}")]
    TypeMismatch {
        construct: String,
        expected: Type,
        found: Type,
        span: Span,
    },

    /// A procedure used as a value, or a function called as an instruction.
    #[error("at {span}: '{name}' is not a {expected}")]
    WrongCallKind {
        name: String,
        expected: &'static str,
        span: Span,
    },

    /// A call with the wrong number of arguments.
    #[error("at {span}: '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// A call chain that leads back to one of its own members.
    #[error("at {span}: recursive call chain {}", chain.join(" -> "))]
    Recursion { chain: Vec<String>, span: Span },

    /// All two-letter place names are in use.
    #[error("ran out of unique place names after {allocated} allocations")]
    NamespaceExhausted { allocated: usize },

    /// A jump to a label that no marker defines.
    #[error("label {label} not found")]
    UndefinedLabel { label: String },

    /// Two markers for the same label.
    #[error("label {label} marked more than once")]
    DuplicateLabel { label: String },

    /// A line number past `u32::MAX`.
    #[error("line {line} with step {line_step} does not fit a line number")]
    LineOverflow { line: usize, line_step: u32 },

    /// A node of the wrong kind in a structural position.
    #[error("at {span}: malformed tree: expected {expected}, found '{found}'")]
    MalformedTree {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },
}

impl CompilationError {
    /// Which class of failure this is.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompilationError::Redeclaration { .. }
            | CompilationError::UndeclaredVariable { .. }
            | CompilationError::UndeclaredName { .. }
            | CompilationError::NotAVariable { .. }
            | CompilationError::NotCallable { .. } => ErrorCategory::Name,
            CompilationError::TypeMismatch { .. }
            | CompilationError::WrongCallKind { .. }
            | CompilationError::ArityMismatch { .. } => ErrorCategory::Type,
            CompilationError::Recursion { .. } => ErrorCategory::Recursion,
            CompilationError::NamespaceExhausted { .. } => ErrorCategory::NamespaceExhausted,
            CompilationError::UndefinedLabel { .. }
            | CompilationError::DuplicateLabel { .. }
            | CompilationError::LineOverflow { .. } => ErrorCategory::Label,
            CompilationError::MalformedTree { .. } => ErrorCategory::Malformed,
        }
    }

    /// Get the span where this error occurred, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::Redeclaration { span, .. }
            | CompilationError::UndeclaredVariable { span, .. }
            | CompilationError::UndeclaredName { span, .. }
            | CompilationError::NotAVariable { span, .. }
            | CompilationError::NotCallable { span, .. }
            | CompilationError::TypeMismatch { span, .. }
            | CompilationError::WrongCallKind { span, .. }
            | CompilationError::ArityMismatch { span, .. }
            | CompilationError::Recursion { span, .. }
            | CompilationError::MalformedTree { span, .. } => Some(*span),
            CompilationError::NamespaceExhausted { .. }
            | CompilationError::UndefinedLabel { .. }
            | CompilationError::DuplicateLabel { .. }
            | CompilationError::LineOverflow { .. } => None,
        }
    }
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Any error produced while turning SPL source into BASIC.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

impl SplError {
    pub fn is_lex(&self) -> bool {
        matches!(self, SplError::Lex(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SplError::Parse(_))
    }

    pub fn is_compilation(&self) -> bool {
        matches!(self, SplError::Compilation(_))
    }

    /// The category of a compilation error, or `None` for lex/parse errors.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            SplError::Compilation(e) => Some(e.category()),
            _ => None,
        }
    }

    /// Get the span where this error occurred, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            SplError::Lex(e) => Some(e.span()),
            SplError::Parse(e) => Some(e.span),
            SplError::Compilation(e) => e.span(),
        }
    }
}
