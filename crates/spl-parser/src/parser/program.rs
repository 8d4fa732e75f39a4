//! Top-level structure: `glob`, `proc`, `func` and `main` blocks.

use spl_core::{NodeId, NodeKind, ParseError, ParseErrorKind, ProgramBlocks, Span};

use super::{MAX_ARITY, Parser, describe};
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    /// `PROGRAM ::= [glob {..}] [proc {..}] [func {..}] main {..}`
    pub(super) fn program(&mut self) -> Result<(ProgramBlocks, Span), ParseError> {
        let start = self.peek().span;

        let globals = self.globals()?;
        let procs = self.definitions(TokenKind::Proc)?;
        let funcs = self.definitions(TokenKind::Func)?;
        let main = self.main()?;

        if !self.check(TokenKind::Eof) {
            let token = *self.peek();
            return Err(ParseError::new(
                ParseErrorKind::TrailingInput,
                token.span,
                format!("{} after the main block", describe(&token)),
            ));
        }

        let blocks = ProgramBlocks {
            globals,
            procs,
            funcs,
            main,
        };
        Ok((blocks, self.span_from(start)))
    }

    /// `glob { VAR* }`, or an empty block when the section is omitted.
    fn globals(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek().span;
        if self.eat(TokenKind::Glob).is_none() {
            let span = Span::point(start.line, start.col);
            return Ok(self.push(NodeKind::Globals { vars: Vec::new() }, span));
        }
        self.expect(TokenKind::LBrace)?;
        let vars = self.variables(None, "global")?;
        self.expect(TokenKind::RBrace)?;
        Ok(self.push(NodeKind::Globals { vars }, self.span_from(start)))
    }

    /// `proc { PDEF* }` or `func { FDEF* }`, or an empty block when omitted.
    fn definitions(&mut self, section: TokenKind) -> Result<NodeId, ParseError> {
        let start = self.peek().span;
        let is_proc = section == TokenKind::Proc;
        let mut defs = Vec::new();
        let mut span = Span::point(start.line, start.col);

        if self.eat(section).is_some() {
            self.expect(TokenKind::LBrace)?;
            while self.check(TokenKind::Identifier) {
                defs.push(self.definition(is_proc)?);
            }
            self.expect(TokenKind::RBrace)?;
            span = self.span_from(start);
        }

        let kind = if is_proc {
            NodeKind::Procedures { defs }
        } else {
            NodeKind::Functions { defs }
        };
        Ok(self.push(kind, span))
    }

    /// `NAME ( VAR* ) { local { VAR* } ALGO [; return ATOM] }`
    fn definition(&mut self, is_proc: bool) -> Result<NodeId, ParseError> {
        let name_token = self.expect(TokenKind::Identifier)?;
        let name = self.push(NodeKind::Name(name_token.lexeme.to_string()), name_token.span);

        self.expect(TokenKind::LParen)?;
        let params = self.variables(Some(MAX_ARITY), "parameter")?;
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::LBrace)?;
        let body_start = self.expect(TokenKind::Local)?.span;
        self.expect(TokenKind::LBrace)?;
        let locals = self.variables(Some(MAX_ARITY), "local")?;
        self.expect(TokenKind::RBrace)?;
        let (algo, open) = self.algo(&[TokenKind::RBrace, TokenKind::Return])?;
        let body = self.push(NodeKind::Body { locals, algo }, self.span_from(body_start));

        let kind = if is_proc {
            NodeKind::Procedure { name, params, body }
        } else {
            if open {
                self.expect(TokenKind::Semicolon)?;
            }
            self.expect(TokenKind::Return)?;
            let ret = self.atom()?;
            NodeKind::Function {
                name,
                params,
                body,
                ret,
            }
        };
        self.expect(TokenKind::RBrace)?;

        Ok(self.push(kind, self.span_from(name_token.span)))
    }

    /// `main { var { VAR* } ALGO }`
    fn main(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::Main)?.span;
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::Var)?;
        self.expect(TokenKind::LBrace)?;
        let vars = self.variables(None, "variable")?;
        self.expect(TokenKind::RBrace)?;
        let (algo, _) = self.algo(&[TokenKind::RBrace])?;
        self.expect(TokenKind::RBrace)?;
        Ok(self.push(NodeKind::Main { vars, algo }, self.span_from(start)))
    }

    /// A run of identifiers, each becoming a `Var` declaration node.
    fn variables(&mut self, limit: Option<usize>, what: &str) -> Result<Vec<NodeId>, ParseError> {
        let mut vars = Vec::new();
        while let Some(token) = self.eat(TokenKind::Identifier) {
            if let Some(max) = limit.filter(|max| vars.len() == *max) {
                return Err(ParseError::new(
                    ParseErrorKind::TooMany,
                    token.span,
                    format!("at most {max} {what}s allowed"),
                ));
            }
            vars.push(self.push(NodeKind::Var(token.lexeme.to_string()), token.span));
        }
        Ok(vars)
    }
}
