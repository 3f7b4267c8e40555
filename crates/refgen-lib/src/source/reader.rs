//! Go declaration reader.

use refgen_core::{Field, Import, SourceUnit, Span, TypeBody, TypeDecl, utils::unquote};
use tracing::trace;

use crate::lexer::{Token, TokenKind, lex_significant, token_text};

use super::SourceError;

type ReadResult<T> = Result<T, SourceError>;

/// Read `text` into a unit. The unit keeps `text` so spans stay meaningful.
pub fn read(name: &str, text: &str) -> ReadResult<SourceUnit> {
    let mut reader = Reader::new(text);
    let mut unit = SourceUnit::new(name, reader.package_clause()?);

    loop {
        reader.skip_terminators();
        let Some(token) = reader.bump() else {
            break;
        };
        match token.kind {
            TokenKind::KwImport => reader.imports(&mut unit.imports)?,
            TokenKind::KwType => reader.types(&mut unit.decls)?,
            _ => reader.skip_declaration(token),
        }
    }

    trace!(
        unit = name,
        imports = unit.imports.len(),
        decls = unit.decls.len(),
        "read unit"
    );
    unit.source = Some(text.to_string());
    Ok(unit)
}

struct Reader<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    last_end: usize,
}

impl<'src> Reader<'src> {
    fn new(source: &'src str) -> Self {
        let tokens = lex_significant(source);
        Self {
            source,
            tokens,
            pos: 0,
            last_end: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        self.last_end = token.span.end;
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == Some(kind) {
            self.bump()
        } else {
            None
        }
    }

    fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    fn error(&self, token: Option<Token>, message: &str) -> SourceError {
        match token {
            Some(token) => SourceError::new(
                format!("{message}, found `{}`", self.text(&token).escape_debug()),
                token.span,
            ),
            None => SourceError::new(
                format!("{message}, found end of file"),
                Span::new(self.source.len(), self.source.len()),
            ),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ReadResult<Token> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.bump();
                Ok(token)
            }
            other => Err(self.error(other, &format!("expected {what}"))),
        }
    }

    fn skip_terminators(&mut self) {
        while self.peek_kind().is_some_and(TokenKind::is_terminator) {
            self.bump();
        }
    }

    fn package_clause(&mut self) -> ReadResult<String> {
        self.skip_terminators();
        self.expect(TokenKind::KwPackage, "package clause")?;
        let name = self.expect(TokenKind::Ident, "package name")?;
        Ok(self.text(&name).to_string())
    }

    /// Skip a declaration we do not model, up to its terminator at depth 0.
    fn skip_declaration(&mut self, first: Token) {
        let mut depth = depth_change(0, first.kind);
        while let Some(token) = self.peek() {
            if depth == 0 && token.kind.is_terminator() {
                break;
            }
            self.bump();
            depth = depth_change(depth, token.kind);
        }
    }

    fn imports(&mut self, imports: &mut Vec<Import>) -> ReadResult<()> {
        if self.eat(TokenKind::ParenOpen).is_none() {
            imports.push(self.import_spec()?);
            return Ok(());
        }
        loop {
            self.skip_terminators();
            if self.eat(TokenKind::ParenClose).is_some() {
                return Ok(());
            }
            imports.push(self.import_spec()?);
        }
    }

    fn import_spec(&mut self) -> ReadResult<Import> {
        let alias = match self.peek_kind() {
            Some(TokenKind::Ident | TokenKind::Dot) => {
                let token = self.bump();
                token.map(|t| self.text(&t).to_string())
            }
            _ => None,
        };
        let path = match self.peek() {
            Some(token) if token.kind.is_string() => {
                self.bump();
                unquote(self.text(&token))
                    .ok_or_else(|| SourceError::new("invalid import path", token.span))?
            }
            other => return Err(self.error(other, "expected import path")),
        };
        Ok(Import { alias, path })
    }

    fn types(&mut self, decls: &mut Vec<TypeDecl>) -> ReadResult<()> {
        if self.eat(TokenKind::ParenOpen).is_none() {
            decls.push(self.type_spec(false)?);
            return Ok(());
        }
        loop {
            self.skip_terminators();
            if self.eat(TokenKind::ParenClose).is_some() {
                return Ok(());
            }
            decls.push(self.type_spec(true)?);
        }
    }

    fn type_spec(&mut self, grouped: bool) -> ReadResult<TypeDecl> {
        let name = self.expect(TokenKind::Ident, "type name")?;
        let alias = self.eat(TokenKind::Equals).is_some();

        let body = if self.peek_kind() == Some(TokenKind::KwStruct)
            && self.nth_kind(1) == Some(TokenKind::BraceOpen)
        {
            self.bump();
            self.bump();
            TypeBody::Struct(self.fields()?)
        } else {
            TypeBody::Other(self.underlying_type(grouped)?)
        };

        trace!(name = self.text(&name), "type declaration");
        Ok(TypeDecl {
            name: self.text(&name).to_string(),
            alias,
            body,
            span: Some(Span::new(name.span.start, self.last_end)),
        })
    }

    fn underlying_type(&mut self, grouped: bool) -> ReadResult<String> {
        let mut depth = 0;
        let mut span: Option<Span> = None;
        while let Some(token) = self.peek() {
            if depth == 0
                && (token.kind.is_terminator() || (grouped && token.kind == TokenKind::ParenClose))
            {
                break;
            }
            self.bump();
            depth = depth_change(depth, token.kind);
            span = Some(span.map_or(token.span, |s| s.cover(token.span)));
        }
        match span {
            Some(span) => Ok(self.source[span.range()].to_string()),
            None => Err(self.error(self.peek(), "expected type")),
        }
    }

    fn fields(&mut self) -> ReadResult<Vec<Field>> {
        let mut fields = Vec::new();
        loop {
            self.skip_terminators();
            match self.peek_kind() {
                Some(TokenKind::BraceClose) => {
                    self.bump();
                    return Ok(fields);
                }
                Some(_) => fields.push(self.field()?),
                None => return Err(self.error(None, "unterminated struct")),
            }
        }
    }

    fn field(&mut self) -> ReadResult<Field> {
        let names = self.field_names()?;
        let ty_span = self.field_type()?;

        let tag = match self.peek() {
            Some(token) if token.kind.is_string() => {
                self.bump();
                let tag = unquote(self.text(&token))
                    .ok_or_else(|| SourceError::new("invalid struct tag", token.span))?;
                Some(tag)
            }
            _ => None,
        };

        match self.peek() {
            Some(token)
                if token.kind.is_terminator() || token.kind == TokenKind::BraceClose => {}
            other => return Err(self.error(other, "expected end of struct field")),
        }

        Ok(Field {
            names,
            ty: self.source[ty_span.range()].to_string(),
            tag,
            ty_span: Some(ty_span),
        })
    }

    /// Names of a field line; empty for embedded fields.
    fn field_names(&mut self) -> ReadResult<Vec<String>> {
        let mut names = Vec::new();
        if self.peek_kind() != Some(TokenKind::Ident) {
            return Ok(names);
        }
        match self.nth_kind(1) {
            Some(TokenKind::Comma) => {
                let first = self.expect(TokenKind::Ident, "field name")?;
                names.push(self.text(&first).to_string());
                while self.eat(TokenKind::Comma).is_some() {
                    self.skip_terminators();
                    let next = self.expect(TokenKind::Ident, "field name")?;
                    names.push(self.text(&next).to_string());
                }
            }
            Some(kind) if starts_type(kind) => {
                let name = self.expect(TokenKind::Ident, "field name")?;
                names.push(self.text(&name).to_string());
            }
            _ => {}
        }
        Ok(names)
    }

    /// Span of a field's type, ending at its tag or terminator.
    fn field_type(&mut self) -> ReadResult<Span> {
        let mut depth = 0;
        let mut span: Option<Span> = None;
        while let Some(token) = self.peek() {
            if depth == 0
                && (token.kind.is_terminator()
                    || token.kind.is_string()
                    || token.kind == TokenKind::BraceClose)
            {
                break;
            }
            self.bump();
            depth = depth_change(depth, token.kind);
            span = Some(span.map_or(token.span, |s| s.cover(token.span)));
        }
        span.ok_or_else(|| self.error(self.peek(), "expected field type"))
    }
}

fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Star
            | TokenKind::BracketOpen
            | TokenKind::ParenOpen
            | TokenKind::KwMap
            | TokenKind::KwChan
            | TokenKind::KwFunc
            | TokenKind::KwStruct
            | TokenKind::KwInterface
    )
}

fn depth_change(depth: u32, kind: TokenKind) -> u32 {
    match kind {
        TokenKind::ParenOpen | TokenKind::BracketOpen | TokenKind::BraceOpen => depth + 1,
        TokenKind::ParenClose | TokenKind::BracketClose | TokenKind::BraceClose => {
            depth.saturating_sub(1)
        }
        _ => depth,
    }
}
