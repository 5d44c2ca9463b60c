//! Byte-oriented lexer for Android Blueprint (`Android.bp`) source.

use crate::tokens::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn span_here(&self) -> Span {
        Span::new(self.line, self.col)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.current() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek() == Some('/') => {
                    while let Some(ch) = self.current() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek() == Some('*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.current() {
                            None => break,
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        let start = self.span_here();
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.current() {
                None => return Err(LexError::UnterminatedString { span: start }),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        None => return Err(LexError::UnterminatedString { span: start }),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => value.push(other),
                    }
                }
                Some(ch) => {
                    self.advance();
                    value.push(ch);
                }
            }
        }
        Ok(Token::new(TokenKind::String(value), start))
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.span_here();
        let mut text = String::new();
        if self.current() == Some('-') {
            text.push('-');
            self.advance();
        }
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        let value: i64 = text.parse().unwrap_or(0);
        Ok(Token::new(TokenKind::Int(value), start))
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.span_here();
        let mut text = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Ident(text), start)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        let span = self.span_here();
        let Some(ch) = self.current() else {
            return Ok(Token::new(TokenKind::Eof, span));
        };
        match ch {
            '{' => {
                self.advance();
                Ok(Token::new(TokenKind::LBrace, span))
            }
            '}' => {
                self.advance();
                Ok(Token::new(TokenKind::RBrace, span))
            }
            '[' => {
                self.advance();
                Ok(Token::new(TokenKind::LBracket, span))
            }
            ']' => {
                self.advance();
                Ok(Token::new(TokenKind::RBracket, span))
            }
            '(' => {
                self.advance();
                Ok(Token::new(TokenKind::LParen, span))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenKind::RParen, span))
            }
            ':' => {
                self.advance();
                Ok(Token::new(TokenKind::Colon, span))
            }
            ',' => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, span))
            }
            '=' => {
                self.advance();
                Ok(Token::new(TokenKind::Assign, span))
            }
            '+' => {
                self.advance();
                if self.current() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::PlusAssign, span))
                } else {
                    Ok(Token::new(TokenKind::Plus, span))
                }
            }
            '"' => self.lex_string(),
            '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.lex_ident()),
            other => {
                self.advance();
                Err(LexError::UnexpectedChar { ch: other, span })
            }
        }
    }

    /// Tokenize the whole source, including the trailing end-of-input token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
