//! Rewritten-source printer.
//!
//! Copies a unit's text token by token, substituting rewritten spans and
//! dropping comments. A line left empty by a dropped comment is dropped too.

use crate::context::Rewrite;
use crate::lexer::{TokenKind, lex, token_text};

/// `source` with `rewrites` applied and comments removed.
pub fn print(source: &str, rewrites: &[Rewrite]) -> String {
    let mut rewrites: Vec<&Rewrite> = rewrites.iter().collect();
    rewrites.sort_by_key(|r| r.span.start);
    let mut pending = rewrites.into_iter().peekable();

    let mut out = String::with_capacity(source.len());
    let mut line_had_comment = false;

    for token in lex(source) {
        while pending.peek().is_some_and(|r| r.span.end <= token.span.start) {
            pending.next();
        }
        if let Some(rewrite) = pending.peek() {
            if rewrite.span.range().contains(&token.span.start) {
                if token.span.start == rewrite.span.start {
                    out.push_str(&rewrite.text);
                }
                continue;
            }
        }

        match token.kind {
            kind if kind.is_comment() => {
                let trimmed = out.trim_end_matches([' ', '\t']).len();
                out.truncate(trimmed);
                line_had_comment = true;
            }
            TokenKind::Newline => {
                let line_empty = out.is_empty() || out.ends_with('\n');
                if !(line_had_comment && line_empty) {
                    out.push('\n');
                }
                line_had_comment = false;
            }
            _ => out.push_str(token_text(source, &token)),
        }
    }

    out
}
