//! Instructions and terms.

use spl_core::{BinaryOp, NodeId, NodeKind, ParseError, ParseErrorKind, UnaryOp};

use super::{MAX_ARITY, Parser, describe};
use crate::lexer::{Token, TokenKind};

impl<'src> Parser<'src> {
    /// `ALGO ::= INSTR ( ; INSTR )* [;]`
    ///
    /// Stops in front of any of `terminators` without consuming it. An empty
    /// algorithm is accepted. The flag is set when the last instruction was
    /// not followed by a `;`, and is never set for an empty algorithm.
    pub(super) fn algo(&mut self, terminators: &[TokenKind]) -> Result<(NodeId, bool), ParseError> {
        let start = self.peek().span;
        let mut instrs = Vec::new();
        let mut open = false;

        while !terminators.contains(&self.peek().kind) {
            instrs.push(self.instruction()?);
            open = self.eat(TokenKind::Semicolon).is_none();
            if open {
                break;
            }
        }

        let span = if instrs.is_empty() {
            start
        } else {
            self.span_from(start)
        };
        Ok((self.push(NodeKind::Algo { instrs }, span), open))
    }

    /// A single instruction.
    fn instruction(&mut self) -> Result<NodeId, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Halt => {
                self.advance();
                Ok(self.push(NodeKind::Halt, token.span))
            }
            TokenKind::Print => {
                self.advance();
                let value = self.output()?;
                Ok(self.push(NodeKind::Print { value }, self.span_from(token.span)))
            }
            TokenKind::While => {
                self.advance();
                let cond = self.term()?;
                let body = self.block()?;
                Ok(self.push(NodeKind::While { cond, body }, self.span_from(token.span)))
            }
            TokenKind::Do => {
                self.advance();
                let body = self.block()?;
                self.expect(TokenKind::Until)?;
                let cond = self.term()?;
                Ok(self.push(NodeKind::DoUntil { body, cond }, self.span_from(token.span)))
            }
            TokenKind::If => {
                self.advance();
                let cond = self.term()?;
                let then = self.block()?;
                let kind = if self.eat(TokenKind::Else).is_some() {
                    let otherwise = self.block()?;
                    NodeKind::IfElse {
                        cond,
                        then,
                        otherwise,
                    }
                } else {
                    NodeKind::If { cond, then }
                };
                Ok(self.push(kind, self.span_from(token.span)))
            }
            TokenKind::Identifier if self.peek_nth(1).kind == TokenKind::LParen => {
                let (name, args) = self.call()?;
                Ok(self.push(NodeKind::Call { name, args }, self.span_from(token.span)))
            }
            TokenKind::Identifier => self.assignment(),
            TokenKind::Eof => Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                "expected instruction, found end of file",
            )),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedInstruction,
                token.span,
                format!("expected instruction, found {}", describe(&token)),
            )),
        }
    }

    /// `VAR = NAME ( ATOM* )` or `VAR = TERM`
    fn assignment(&mut self) -> Result<NodeId, ParseError> {
        let target_token = self.expect(TokenKind::Identifier)?;
        let target = self.var(&target_token);
        self.expect(TokenKind::Assign)?;

        let kind = if self.check(TokenKind::Identifier) && self.peek_nth(1).kind == TokenKind::LParen
        {
            let (name, args) = self.call()?;
            NodeKind::CallAssign { target, name, args }
        } else {
            let value = self.term()?;
            NodeKind::Assign { target, value }
        };
        Ok(self.push(kind, self.span_from(target_token.span)))
    }

    /// `NAME ( ATOM{0,3} )`
    fn call(&mut self) -> Result<(NodeId, Vec<NodeId>), ParseError> {
        let name_token = self.expect(TokenKind::Identifier)?;
        let name = self.push(NodeKind::Name(name_token.lexeme.to_string()), name_token.span);

        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            if args.len() == MAX_ARITY {
                return Err(ParseError::new(
                    ParseErrorKind::TooMany,
                    self.peek().span,
                    format!("at most {MAX_ARITY} arguments allowed"),
                ));
            }
            args.push(self.atom()?);
        }
        self.expect(TokenKind::RParen)?;

        Ok((name, args))
    }

    /// `{ ALGO }`
    fn block(&mut self) -> Result<NodeId, ParseError> {
        let open = self.expect(TokenKind::LBrace)?;
        self.nested(open.span, |p| {
            let (algo, _) = p.algo(&[TokenKind::RBrace])?;
            p.expect(TokenKind::RBrace)?;
            Ok(algo)
        })
    }

    /// `OUTPUT ::= ATOM | string`
    fn output(&mut self) -> Result<NodeId, ParseError> {
        if let Some(token) = self.eat(TokenKind::Text) {
            let text = token.lexeme.trim_matches('"').to_string();
            return Ok(self.push(NodeKind::Text(text), token.span));
        }
        self.atom()
    }

    /// `ATOM ::= VAR | number`
    pub(super) fn atom(&mut self) -> Result<NodeId, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(self.var(&token))
            }
            TokenKind::Number => {
                self.advance();
                Ok(self.push(NodeKind::Number(token.lexeme.to_string()), token.span))
            }
            _ => Err(ParseError::expected_token(
                token.span,
                "variable or number",
                &describe(&token),
            )),
        }
    }

    /// `TERM ::= ATOM | ( UNOP TERM ) | ( TERM BINOP TERM )`
    fn term(&mut self) -> Result<NodeId, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Identifier | TokenKind::Number => self.atom(),
            TokenKind::LParen => {
                self.advance();
                let kind = self.nested(token.span, |p| {
                    if p.peek().kind.is_unary_op() {
                        let op_token = p.advance();
                        let op = UnaryOp::from_keyword(op_token.lexeme).ok_or_else(|| {
                            ParseError::new(
                                ParseErrorKind::ExpectedTerm,
                                op_token.span,
                                "bad operator",
                            )
                        })?;
                        let operand = p.term()?;
                        Ok(NodeKind::Unary { op, operand })
                    } else {
                        let lhs = p.term()?;
                        let op = p.binary_op()?;
                        let rhs = p.term()?;
                        Ok(NodeKind::Binary { op, lhs, rhs })
                    }
                })?;
                self.expect(TokenKind::RParen)?;
                Ok(self.push(kind, self.span_from(token.span)))
            }
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedTerm,
                token.span,
                format!("expected term, found {}", describe(&token)),
            )),
        }
    }

    fn binary_op(&mut self) -> Result<BinaryOp, ParseError> {
        let token = *self.peek();
        let op = token
            .kind
            .is_binary_op()
            .then(|| BinaryOp::from_keyword(token.lexeme))
            .flatten();
        match op {
            Some(op) => {
                self.advance();
                Ok(op)
            }
            None => Err(ParseError::expected_token(
                token.span,
                "binary operator",
                &describe(&token),
            )),
        }
    }

    fn var(&mut self, token: &Token<'src>) -> NodeId {
        self.push(NodeKind::Var(token.lexeme.to_string()), token.span)
    }
}

#[cfg(test)]
mod tests {
    use crate::{MAX_NESTING, parse};
    use spl_core::{Ast, BinaryOp, NodeId, NodeKind, ParseErrorKind, SplError, UnaryOp};

    /// Parse `instrs` as the body of `main` and return its instructions.
    fn main_instrs(instrs: &str) -> (Ast, Vec<NodeId>) {
        let ast = parse(&format!("main {{ var {{}} {instrs} }}")).unwrap();
        let NodeKind::Main { algo, .. } = ast.kind(ast.blocks().main) else {
            panic!("expected main");
        };
        let instrs = ast.children(*algo);
        (ast, instrs)
    }

    fn parse_err(instrs: &str) -> ParseErrorKind {
        match parse(&format!("main {{ var {{}} {instrs} }}")) {
            Err(SplError::Parse(e)) => e.kind,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn simple_instructions() {
        let (ast, instrs) = main_instrs("halt; print x; print 7; print \"hi there\"");
        assert_eq!(instrs.len(), 4);
        assert_eq!(ast.kind(instrs[0]), &NodeKind::Halt);

        let tags: Vec<_> = instrs[1..]
            .iter()
            .map(|id| match ast.kind(*id) {
                NodeKind::Print { value } => ast.kind(*value).clone(),
                other => panic!("expected print, got {other:?}"),
            })
            .collect();
        assert_eq!(
            tags,
            vec![
                NodeKind::Var("x".into()),
                NodeKind::Number("7".into()),
                NodeKind::Text("hi there".into())
            ]
        );
    }

    #[test]
    fn trailing_semicolon_allowed() {
        let (_, instrs) = main_instrs("halt; halt;");
        assert_eq!(instrs.len(), 2);
    }

    #[test]
    fn empty_main_algo() {
        let (_, instrs) = main_instrs("");
        assert!(instrs.is_empty());
    }

    #[test]
    fn nested_terms() {
        let (ast, instrs) = main_instrs("x = (x plus ((neg z) mult 3))");
        let NodeKind::Assign { value, .. } = ast.kind(instrs[0]) else {
            panic!("expected assign");
        };
        let NodeKind::Binary { op, rhs, .. } = ast.kind(*value) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Plus);
        let NodeKind::Binary { op, lhs, .. } = ast.kind(*rhs) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Mult);
        assert!(matches!(
            ast.kind(*lhs),
            NodeKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn call_forms() {
        let (ast, instrs) = main_instrs("p(x 1); y = f(); y = f");
        assert!(matches!(ast.kind(instrs[0]), NodeKind::Call { args, .. } if args.len() == 2));
        assert!(matches!(ast.kind(instrs[1]), NodeKind::CallAssign { args, .. } if args.is_empty()));
        assert!(matches!(ast.kind(instrs[2]), NodeKind::Assign { .. }));
    }

    #[test]
    fn control_flow() {
        let (ast, instrs) = main_instrs(
            "while (x > 0) { x = (x minus 1) };
             do { x = (x plus 1) } until (x eq 10);
             if (x eq 1) { halt };
             if (not (x eq 1)) { halt } else { print x }",
        );
        let tags: Vec<_> = instrs.iter().map(|id| ast.kind(*id).tag()).collect();
        assert_eq!(tags, vec!["while", "do", "if", "ifelse"]);
    }

    #[test]
    fn spans_of_terms() {
        let (ast, instrs) = main_instrs("x = (a plus b)");
        let NodeKind::Assign { value, .. } = ast.kind(instrs[0]) else {
            panic!("expected assign");
        };
        let span = ast.span(*value);
        assert_eq!((span.col, span.len), (19, 10));
    }

    #[test]
    fn missing_semicolon_between_instructions() {
        assert_eq!(parse_err("halt halt"), ParseErrorKind::ExpectedToken);
    }

    #[test]
    fn too_many_arguments() {
        assert_eq!(parse_err("p(a b c d)"), ParseErrorKind::TooMany);
    }

    #[test]
    fn arguments_must_be_atoms() {
        assert_eq!(parse_err("p((a plus b))"), ParseErrorKind::ExpectedToken);
    }

    #[test]
    fn bad_terms() {
        assert_eq!(parse_err("x = (a b)"), ParseErrorKind::ExpectedToken);
        assert_eq!(parse_err("x = ;"), ParseErrorKind::ExpectedTerm);
        assert_eq!(parse_err("x = (a plus b"), ParseErrorKind::ExpectedToken);
    }

    #[test]
    fn not_an_instruction() {
        assert_eq!(parse_err("return x"), ParseErrorKind::ExpectedInstruction);
    }

    fn negated(depth: usize) -> String {
        format!("x = {}1{}", "(neg ".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn term_nesting_limit() {
        let (ast, instrs) = main_instrs(&negated(MAX_NESTING));
        assert_eq!(instrs.len(), 1);
        assert!(matches!(ast.kind(instrs[0]), NodeKind::Assign { .. }));

        assert_eq!(parse_err(&negated(MAX_NESTING + 1)), ParseErrorKind::TooMany);
        assert_eq!(parse_err(&negated(100_000)), ParseErrorKind::TooMany);
    }

    #[test]
    fn block_nesting_limit() {
        let depth = MAX_NESTING + 1;
        let source = format!("{}halt{}", "while x { ".repeat(depth), " }".repeat(depth));
        assert_eq!(parse_err(&source), ParseErrorKind::TooMany);
    }
}
