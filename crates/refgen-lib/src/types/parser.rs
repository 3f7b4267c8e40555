//! Recursive descent parser for type expressions.
//!
//! Each production consumes its prefix token and recurses into the element
//! type, so layers are applied innermost-first while the resulting tree keeps
//! them in declaration order.

use crate::lexer::{Token, TokenKind, lex_significant, token_text};

use super::{Identifier, SyntaxError, TypeExpr};

/// Deeper nesting than this is rejected rather than risking the stack.
const MAX_DEPTH: u32 = 128;

/// Parse a type expression into its canonical descriptor.
pub fn parse(expr: &str) -> Result<Identifier, SyntaxError> {
    parse_expr(expr).map(Identifier::from_expr)
}

/// Parse a type expression into its structural form.
pub fn parse_expr(expr: &str) -> Result<TypeExpr, SyntaxError> {
    let mut parser = TypeParser::new(expr);
    let ty = parser.parse_type()?;
    if let Some(token) = parser.peek() {
        return Err(parser.unexpected(token, "unexpected trailing input"));
    }
    Ok(ty)
}

struct TypeParser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    depth: u32,
}

impl<'src> TypeParser<'src> {
    fn new(source: &'src str) -> Self {
        let tokens = lex_significant(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .collect();
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            expr: self.source.trim().to_string(),
            message: message.into(),
            offset,
        }
    }

    fn unexpected(&self, token: Token, message: &str) -> SyntaxError {
        self.error(
            token.span.start,
            format!("{message}, found `{}`", self.text(&token)),
        )
    }

    fn eof(&self, message: &str) -> SyntaxError {
        self.error(self.source.len(), format!("{message}, found end of input"))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, SyntaxError> {
        match self.bump() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.unexpected(token, &format!("expected {what}"))),
            None => Err(self.eof(&format!("expected {what}"))),
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            let offset = self.peek().map_or(self.source.len(), |t| t.span.start);
            return Err(self.error(offset, "type expression nested too deeply"));
        }
        self.depth += 1;
        let ty = self.parse_type_inner();
        self.depth -= 1;
        ty
    }

    fn parse_type_inner(&mut self) -> Result<TypeExpr, SyntaxError> {
        let Some(token) = self.bump() else {
            return Err(self.eof("expected a type"));
        };

        match token.kind {
            TokenKind::Ident => self.parse_qualified(token),
            TokenKind::Star => Ok(TypeExpr::pointer(self.parse_type()?)),
            TokenKind::BracketOpen => match self.peek_kind() {
                Some(TokenKind::BracketClose) => {
                    self.bump();
                    Ok(TypeExpr::slice(self.parse_type()?))
                }
                Some(_) => Err(self.error(
                    token.span.start,
                    "fixed-size arrays are not supported; only dynamic slices are supported",
                )),
                None => Err(self.eof("expected `]`")),
            },
            TokenKind::KwMap => {
                self.expect(TokenKind::BracketOpen, "`[` after `map`")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::BracketClose, "`]` after map key type")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::map(key, value))
            }
            TokenKind::KwChan => Err(self.error(token.span.start, "channel types are not supported")),
            TokenKind::KwFunc => Err(self.error(token.span.start, "function types are not supported")),
            TokenKind::KwStruct => Err(self.error(
                token.span.start,
                "anonymous struct types are not supported",
            )),
            TokenKind::KwInterface => Err(self.error(
                token.span.start,
                "interface types are not supported",
            )),
            TokenKind::ParenOpen => Err(self.error(
                token.span.start,
                "parenthesized types are not supported",
            )),
            _ => Err(self.unexpected(token, "expected a type")),
        }
    }

    /// `Name` or `a.b.Name`: the prefix before the last dot is the qualifier.
    fn parse_qualified(&mut self, first: Token) -> Result<TypeExpr, SyntaxError> {
        let mut prefix: Vec<&'src str> = Vec::new();
        let mut name = self.text(&first);
        while self.peek_kind() == Some(TokenKind::Dot) {
            self.bump();
            let segment = self.expect(TokenKind::Ident, "identifier after `.`")?;
            prefix.push(name);
            name = self.text(&segment);
        }

        let qualifier = (!prefix.is_empty()).then(|| prefix.join("."));
        Ok(TypeExpr::Named {
            qualifier,
            name: name.to_string(),
        })
    }
}
