//! Main lexer implementation for SPL.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s, dispatching
//! on the first character of each token. Lexing stops at the first error.

use spl_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_letter};
use super::token::{Token, TokenKind, lookup_keyword};

/// Longest string literal SPL accepts, in characters.
pub const MAX_STRING_LEN: usize = 15;

/// Lexer for SPL source code.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenize the whole source, ending with an `Eof` token.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn tokenize(source: &'src str) -> Result<Vec<Token<'src>>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::with_capacity(source.len() / 4 + 1);
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token<'src>, LexError> {
        self.cursor.eat_while(|c| c.is_whitespace());

        let line = self.cursor.line();
        let col = self.cursor.column();
        let start = self.cursor.offset();

        let Some(ch) = self.cursor.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", Span::point(line, col)));
        };

        match ch {
            '"' => self.scan_string(line, col, start),
            c if c.is_ascii_digit() => self.scan_number(line, col, start),
            c if is_ident_letter(c) => Ok(self.scan_identifier(line, col, start)),
            _ => self.scan_punctuation(ch, line, col, start),
        }
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn make_token(&self, kind: TokenKind, line: u32, col: u32, start: u32) -> Token<'src> {
        let lexeme = self.cursor.slice_from(start);
        Token::new(kind, lexeme, Span::new(line, col, lexeme.len() as u32))
    }

    /// Letters followed by digits: `[a-z][a-z]*[0-9]*`.
    fn scan_identifier(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        let letters = self.cursor.eat_while(is_ident_letter);
        let digits = self.cursor.eat_while(|c| c.is_ascii_digit());
        let kind = if digits.is_empty() {
            lookup_keyword(letters).unwrap_or(TokenKind::Identifier)
        } else {
            TokenKind::Identifier
        };
        self.make_token(kind, line, col, start)
    }

    /// `0 | [1-9][0-9]*`, not immediately followed by a letter.
    fn scan_number(&mut self, line: u32, col: u32, start: u32) -> Result<Token<'src>, LexError> {
        let digits = self.cursor.eat_while(|c| c.is_ascii_digit());
        let span = Span::new(line, col, digits.len() as u32);

        if digits.len() > 1 && digits.starts_with('0') {
            return Err(LexError::InvalidNumber {
                span,
                detail: format!("leading zero in '{digits}'"),
            });
        }
        if self.cursor.check(|c| c.is_ascii_alphabetic()) {
            return Err(LexError::InvalidNumber {
                span,
                detail: format!("letters directly after '{digits}'"),
            });
        }

        Ok(self.make_token(TokenKind::Number, line, col, start))
    }

    /// A double-quoted string on a single line.
    fn scan_string(&mut self, line: u32, col: u32, start: u32) -> Result<Token<'src>, LexError> {
        self.cursor.advance();
        let content = self.cursor.eat_while(|c| c != '"' && c != '\n');

        if !self.cursor.eat('"') {
            return Err(LexError::UnterminatedString {
                span: Span::point(line, col),
            });
        }

        let len = content.chars().count();
        if len > MAX_STRING_LEN {
            return Err(LexError::StringTooLong {
                len,
                max: MAX_STRING_LEN,
                span: Span::new(line, col, len as u32 + 2),
            });
        }

        Ok(self.make_token(TokenKind::Text, line, col, start))
    }

    fn scan_punctuation(
        &mut self,
        ch: char,
        line: u32,
        col: u32,
        start: u32,
    ) -> Result<Token<'src>, LexError> {
        let kind = match ch {
            '=' => TokenKind::Assign,
            '>' => TokenKind::Greater,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            _ => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    span: Span::new(line, col, ch.len_utf8() as u32),
                });
            }
        };
        self.cursor.advance();
        Ok(self.make_token(kind, line, col, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_source_is_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("while whilex x1 main"),
            vec![
                TokenKind::While,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Main,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn keyword_with_digits_is_identifier() {
        let tokens = Lexer::tokenize("if2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "if2");
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            kinds("x = (a > 0);{}"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::Greater,
                TokenKind::Number,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn spans_track_position() {
        let tokens = Lexer::tokenize("main {\n  halt\n}").unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 4));
        assert_eq!(tokens[2].span, Span::new(2, 3, 4));
        assert_eq!(tokens[3].span, Span::new(3, 1, 1));
    }

    #[test]
    fn numbers() {
        let tokens = Lexer::tokenize("0 10 907").unwrap();
        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme).collect();
        assert_eq!(lexemes, vec!["0", "10", "907", ""]);
    }

    #[test]
    fn leading_zero_rejected() {
        let err = Lexer::tokenize("x = 012").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { .. }));
        assert_eq!(err.span(), Span::new(1, 5, 3));
    }

    #[test]
    fn number_glued_to_letters_rejected() {
        let err = Lexer::tokenize("12ab").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { .. }));
    }

    #[test]
    fn strings() {
        let tokens = Lexer::tokenize("print \"hello world\"").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Text);
        assert_eq!(tokens[1].lexeme, "\"hello world\"");
    }

    #[test]
    fn string_length_limit() {
        assert!(Lexer::tokenize("\"fifteen chars!!\"").is_ok());
        let err = Lexer::tokenize("\"sixteen chars!!!\"").unwrap_err();
        assert_eq!(
            err,
            LexError::StringTooLong {
                len: 16,
                max: MAX_STRING_LEN,
                span: Span::new(1, 1, 18)
            }
        );
    }

    #[test]
    fn unterminated_string() {
        let err = Lexer::tokenize("print \"abc\nhalt").unwrap_err();
        assert_eq!(
            err,
            LexError::UnterminatedString {
                span: Span::point(1, 7)
            }
        );
    }

    #[test]
    fn unexpected_character() {
        let err = Lexer::tokenize("x = a + b").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedChar {
                ch: '+',
                span: Span::new(1, 7, 1)
            }
        );
    }

    #[test]
    fn uppercase_is_unexpected() {
        assert!(matches!(
            Lexer::tokenize("X").unwrap_err(),
            LexError::UnexpectedChar { ch: 'X', .. }
        ));
    }
}
