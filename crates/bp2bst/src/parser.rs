//! Recursive-descent parser for Android Blueprint (`Android.bp`) source.

use crate::ast::*;
use crate::lexer::{LexError, Lexer};
use crate::tokens::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("{message} at {span}")]
    Syntax { message: String, span: Span },
}

impl ParseError {
    fn unexpected(found: &TokenKind, expected: &str, span: Span) -> Self {
        ParseError::Syntax {
            message: format!("unexpected {found}; expected {expected}"),
            span,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::UnexpectedChar { ch, span } => ParseError::Syntax {
                message: format!("unexpected character '{ch}'"),
                span,
            },
            LexError::UnterminatedString { span } => ParseError::Syntax {
                message: "unterminated string".to_string(),
                span,
            },
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a complete file, named `name` for diagnostics purposes.
    pub fn parse_file(source: &str, name: impl Into<String>) -> Result<File, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        let mut parser = Parser::new(tokens);
        parser.file(name.into())
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn expect(&mut self, expected: &TokenKind, label: &str) -> Result<Token, ParseError> {
        if std::mem::discriminant(&self.current().kind) == std::mem::discriminant(expected) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(&self.current().kind, label, self.current_span()))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        let span = self.current_span();
        match self.current().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, span))
            }
            other => Err(ParseError::unexpected(&other, "identifier", span)),
        }
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        let span = self.current_span();
        match self.current().kind.clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(ParseError::unexpected(&other, "string literal", span)),
        }
    }

    fn file(&mut self, name: String) -> Result<File, ParseError> {
        let mut defs = Vec::new();
        while !self.at_eof() {
            defs.push(self.definition()?);
        }
        Ok(File { name, defs })
    }

    fn definition(&mut self) -> Result<Def, ParseError> {
        let (ident, span) = self.expect_ident()?;
        match &self.current().kind {
            TokenKind::Assign => {
                self.advance();
                let value = self.expr()?;
                Ok(Def::Assignment(Assignment {
                    name: ident,
                    value,
                    assigner: Assigner::Set,
                    span,
                }))
            }
            TokenKind::PlusAssign => {
                self.advance();
                let value = self.expr()?;
                Ok(Def::Assignment(Assignment {
                    name: ident,
                    value,
                    assigner: Assigner::Append,
                    span,
                }))
            }
            TokenKind::LBrace => {
                let properties = self.map_body()?;
                let mut module = Module::new(ident, properties);
                module.span = span;
                Ok(Def::Module(module))
            }
            other => Err(ParseError::unexpected(other, "'=', '+=', or '{'", self.current_span())),
        }
    }

    fn map_body(&mut self) -> Result<Vec<Property>, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut props = Vec::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            let (name, _) = self.expect_ident()?;
            self.expect(&TokenKind::Colon, "':'")?;
            let value = self.expr()?;
            props.push(Property::new(name, value));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace, "',' or '}'")?;
                break;
            }
        }
        Ok(props)
    }

    fn expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.primary()?;
        while self.eat(&TokenKind::Plus) {
            let right = self.primary()?;
            left = Expression::Operator {
                left: Box::new(left),
                op: "+".to_string(),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn primary(&mut self) -> Result<Expression, ParseError> {
        let span = self.current_span();
        match self.current().kind.clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(Expression::String(s))
            }
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expression::Int(n))
            }
            TokenKind::LBracket => self.list(),
            TokenKind::LBrace => Ok(Expression::Map(self.map_body()?)),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => {
                    self.advance();
                    Ok(Expression::Bool(true))
                }
                "false" => {
                    self.advance();
                    Ok(Expression::Bool(false))
                }
                "unset" => {
                    self.advance();
                    Ok(Expression::unset())
                }
                "select" => self.select(),
                _ => {
                    self.advance();
                    Ok(Expression::VariableRef(name))
                }
            },
            other => Err(ParseError::unexpected(&other, "expression", span)),
        }
    }

    fn list(&mut self) -> Result<Expression, ParseError> {
        self.expect(&TokenKind::LBracket, "'['")?;
        let mut values = Vec::new();
        loop {
            if self.eat(&TokenKind::RBracket) {
                break;
            }
            values.push(self.expr()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBracket, "',' or ']'")?;
                break;
            }
        }
        Ok(Expression::List(values))
    }

    fn select(&mut self) -> Result<Expression, ParseError> {
        self.advance(); // 'select'
        self.expect(&TokenKind::LParen, "'('")?;
        let (func_name, _) = self.expect_ident()?;
        self.expect(&TokenKind::LParen, "'('")?;
        let mut func_args = Vec::new();
        loop {
            if self.eat(&TokenKind::RParen) {
                break;
            }
            func_args.push(self.expect_string()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen, "',' or ')'")?;
                break;
            }
        }
        self.expect(&TokenKind::Comma, "','")?;
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut cases = Vec::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            let patterns = self.select_patterns()?;
            self.expect(&TokenKind::Colon, "':'")?;
            let value = self.expr()?;
            cases.push((patterns, value));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace, "',' or '}'")?;
                break;
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(Expression::Select {
            func_name,
            func_args,
            cases,
        })
    }

    fn select_patterns(&mut self) -> Result<Vec<Expression>, ParseError> {
        let span = self.current_span();
        match self.current().kind.clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(vec![Expression::String(s)])
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(vec![Expression::String(name)])
            }
            TokenKind::LParen => {
                self.advance();
                let mut patterns = Vec::new();
                loop {
                    if self.eat(&TokenKind::RParen) {
                        break;
                    }
                    patterns.push(Expression::String(self.expect_string()?));
                    if !self.eat(&TokenKind::Comma) {
                        self.expect(&TokenKind::RParen, "',' or ')'")?;
                        break;
                    }
                }
                if patterns.is_empty() {
                    return Err(ParseError::Syntax {
                        message: "select case pattern tuple must not be empty".to_string(),
                        span,
                    });
                }
                Ok(patterns)
            }
            other => Err(ParseError::unexpected(&other, "select case pattern", span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> File {
        Parser::parse_file(src, "test.bp").unwrap()
    }

    #[test]
    fn simple_module() {
        let f = parse(r#"cc_library_static { name: "libbz", srcs: ["a.c", "b.c"] }"#);
        assert_eq!(f.defs.len(), 1);
        let Def::Module(m) = &f.defs[0] else { panic!("expected module") };
        assert_eq!(m.module_type, "cc_library_static");
        assert_eq!(m.name(), Some("libbz"));
    }

    #[test]
    fn assignment_and_append() {
        let f = parse("base = [\"-O2\"]\nbase += [\"-Wall\"]\n");
        assert_eq!(f.defs.len(), 2);
        assert!(matches!(&f.defs[0], Def::Assignment(a) if a.assigner == Assigner::Set));
        assert!(matches!(&f.defs[1], Def::Assignment(a) if a.assigner == Assigner::Append));
    }

    #[test]
    fn operator_left_associative() {
        let f = parse(r#"x = "a" + "b" + "c""#);
        let Def::Assignment(a) = &f.defs[0] else { panic!() };
        match &a.value {
            Expression::Operator { left, .. } => {
                assert!(matches!(**left, Expression::Operator { .. }));
            }
            _ => panic!("expected operator"),
        }
    }

    #[test]
    fn trailing_commas_allowed() {
        let f = parse("x = [\"a\", \"b\",]\n");
        let Def::Assignment(a) = &f.defs[0] else { panic!() };
        assert_eq!(a.value, Expression::List(vec![Expression::String("a".into()), Expression::String("b".into())]));
    }

    #[test]
    fn unset_keyword() {
        let f = parse("x = unset\n");
        let Def::Assignment(a) = &f.defs[0] else { panic!() };
        assert!(a.value.is_unset());
    }

    #[test]
    fn select_with_tuple_and_ident_patterns() {
        let f = parse(
            r#"x = select(soong_config_variable("my_namespace", "feature"), {
                ("a", "b"): "ab",
                default: "d",
            })"#,
        );
        let Def::Assignment(a) = &f.defs[0] else { panic!() };
        match &a.value {
            Expression::Select { func_name, cases, .. } => {
                assert_eq!(func_name, "soong_config_variable");
                assert_eq!(cases.len(), 2);
                assert_eq!(cases[0].0.len(), 2);
                assert_eq!(cases[1].0, vec![Expression::String("default".into())]);
            }
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn unexpected_token_reports_position() {
        let err = Parser::parse_file("cc_binary { name: }", "t.bp").unwrap_err();
        match err {
            ParseError::Syntax { span, .. } => assert_eq!(span, Span::new(1, 19)),
        }
    }
}
