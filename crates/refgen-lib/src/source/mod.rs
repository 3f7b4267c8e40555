//! Go declaration reading and rewritten-source printing.
//!
//! The reader recognizes just enough of Go to find the package clause,
//! imports, and type declarations of a file. Function bodies and other
//! top-level declarations are skipped by bracket depth.

pub mod printer;
pub mod reader;

#[cfg(test)]
mod printer_tests;
#[cfg(test)]
mod reader_tests;

use refgen_core::{SourceUnit, Span};

use crate::{Error, Result};

/// Declaration text the reader could not make sense of.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SourceError {
    pub message: String,
    pub span: Span,
}

impl SourceError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Read one Go file into a unit named `name`.
pub fn read_unit(name: &str, text: &str) -> Result<SourceUnit> {
    reader::read(name, text).map_err(|e| {
        let span = e.span;
        Error::Source(e).at(name, Some(span))
    })
}
