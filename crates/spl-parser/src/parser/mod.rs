//! Parser infrastructure for SPL.
//!
//! Provides the main [`Parser`] struct with token navigation. The grammar
//! itself lives in two submodules:
//! - `program`: top-level blocks, procedure and function definitions
//! - `algo`: instructions and terms
//!
//! The parser is recursive descent with at most two tokens of lookahead and
//! stops at the first error.

mod algo;
mod program;

use spl_core::{Ast, AstBuilder, NodeId, NodeKind, ParseError, ParseErrorKind, Span};

use crate::lexer::{Token, TokenKind};

/// Most parameters, locals or call arguments a definition may have.
pub const MAX_ARITY: usize = 3;

/// Deepest nesting of parenthesized terms and `{ }` blocks.
pub const MAX_NESTING: usize = 200;

/// Recursive-descent parser over a pre-tokenized SPL source.
pub struct Parser<'src> {
    /// All tokens, ending with `Eof`.
    tokens: Vec<Token<'src>>,
    /// Index of the current token.
    position: usize,
    /// Nodes built so far.
    builder: AstBuilder,
    /// Open parentheses and blocks around the current token.
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a parser over a token stream.
    ///
    /// A missing trailing `Eof` token is added.
    pub fn new(mut tokens: Vec<Token<'src>>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            position: 0,
            builder: AstBuilder::new(),
            depth: 0,
        }
    }

    /// Parse a whole program and freeze it into an [`Ast`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_program(mut self) -> Result<Ast, ParseError> {
        let (blocks, span) = self.program()?;
        let ast = self.builder.finish(blocks, span);
        tracing::trace!(nodes = ast.len(), "parsed program");
        Ok(ast)
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> &Token<'src> {
        self.peek_nth(0)
    }

    /// Peek ahead n tokens without consuming; clamps to `Eof`.
    pub fn peek_nth(&self, n: usize) -> &Token<'src> {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    /// Get the current token and advance to the next.
    ///
    /// Never moves past `Eof`.
    pub fn advance(&mut self) -> Token<'src> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// Check if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// If the current token matches the given kind, consume it.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the current token to be of the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                format!("expected {kind}, found end of file"),
            ))
        } else {
            Err(ParseError::expected_token(
                token.span,
                kind.description(),
                &describe(&token),
            ))
        }
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.builder.push(kind, span)
    }

    /// Run `f` one nesting level deeper, failing once [`MAX_NESTING`] is
    /// reached.
    fn nested<T>(
        &mut self,
        at: Span,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth == MAX_NESTING {
            return Err(ParseError::new(
                ParseErrorKind::TooMany,
                at,
                format!("nesting deeper than {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Span running from `start` to the previously consumed token.
    fn span_from(&self, start: Span) -> Span {
        let end = self.tokens[self.position.saturating_sub(1)].span;
        start.to(end)
    }
}

/// How a token is named in diagnostics.
fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Identifier | TokenKind::Number | TokenKind::Text => {
            format!("{} '{}'", token.kind, token.lexeme)
        }
        kind => kind.description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parser(source: &str) -> Parser<'_> {
        Parser::new(Lexer::tokenize(source).unwrap())
    }

    #[test]
    fn token_navigation() {
        let mut p = parser("x = 1");
        assert_eq!(p.peek().kind, TokenKind::Identifier);
        assert_eq!(p.peek_nth(1).kind, TokenKind::Assign);
        assert_eq!(p.peek_nth(9).kind, TokenKind::Eof);

        let token = p.advance();
        assert_eq!(token.lexeme, "x");
        assert_eq!(p.peek().kind, TokenKind::Assign);
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut p = parser("halt");
        p.advance();
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert_eq!(p.advance().kind, TokenKind::Eof);
    }

    #[test]
    fn check_and_eat() {
        let mut p = parser("halt ;");
        assert!(p.check(TokenKind::Halt));
        assert!(p.eat(TokenKind::Semicolon).is_none());
        assert!(p.eat(TokenKind::Halt).is_some());
        assert!(p.check(TokenKind::Semicolon));
    }

    #[test]
    fn expect_failure_names_found_token() {
        let mut p = parser("x");
        let err = p.expect(TokenKind::LBrace).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
        assert_eq!(err.message, "expected '{', found identifier 'x'");
    }

    #[test]
    fn expect_at_eof() {
        let mut p = parser("");
        let err = p.expect(TokenKind::Main).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn missing_eof_is_added() {
        let p = Parser::new(Vec::new());
        assert!(p.check(TokenKind::Eof));
    }
}
