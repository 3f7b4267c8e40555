//! Lexer for Go declaration text and type expressions.
//!
//! Produces span-based tokens without storing text; text is sliced from the
//! source only when needed. Only the subset of Go needed to find type
//! declarations is recognized. Everything else (operators inside function
//! bodies, for example) becomes `Garbage`.
//!
//! Consecutive unrecognized characters are coalesced into a single `Garbage`
//! token rather than one per character.

use logos::Logos;
use refgen_core::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("*")]
    Star,

    #[token(".")]
    Dot,

    #[token("...")]
    Ellipsis,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Equals,

    #[token("package")]
    KwPackage,

    #[token("import")]
    KwImport,

    #[token("type")]
    KwType,

    #[token("struct")]
    KwStruct,

    #[token("interface")]
    KwInterface,

    #[token("map")]
    KwMap,

    #[token("chan")]
    KwChan,

    #[token("func")]
    KwFunc,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r"`[^`]*`")]
    RawStringLit,

    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    CharLit,

    #[regex(r"[ \t\r\x0c]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
}

impl TokenKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Ends a statement at nesting depth zero.
    #[inline]
    pub fn is_terminator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }

    #[inline]
    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::StringLit | TokenKind::RawStringLit)
    }
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokenizes source into a vector of span-based tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(TokenKind::Garbage, Span::new(start, end)));
                }
                let span = lexer.span();
                tokens.push(Token::new(kind, Span::new(span.start, span.end)));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        TokenKind::Garbage,
                        Span::new(start, source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.span.range()]
}

/// Tokens with trivia removed.
pub fn lex_significant(source: &str) -> Vec<Token> {
    lex(source)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect()
}
