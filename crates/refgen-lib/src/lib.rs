//! refgen: reference wrappers and deterministic JSON marshaling for Go types.
//!
//! This crate provides the generation pipeline:
//! - `lexer` - tokens for Go declarations and type expressions
//! - `types` - type expression parser and naming synthesis
//! - `policy` - struct tag policy resolution
//! - `context` - per-package tables built during the collect phase
//! - `codegen` - wrapper types, marshal plans, Go rendering, plan evaluation
//! - `driver` - two-phase collect/emit orchestration over a sink
//! - `source` - Go declaration reader and rewritten-source printer

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod codegen;
pub mod config;
pub mod context;
pub mod driver;
pub mod lexer;
pub mod policy;
pub mod source;
pub mod types;

#[cfg(test)]
mod context_tests;
#[cfg(test)]
pub mod test_utils;

use refgen_core::Span;

pub use config::Config;
pub use context::Context;
pub use driver::{Artifact, Driver, MemorySink, Package, Sink};
pub use source::SourceError;
pub use types::{Identifier, SyntaxError, TypeExpr};

/// Suffix appended to a canonical base name to name its wrapper type.
pub const REF_SUFFIX: &str = "Ref";
/// Struct tag key carrying wire names.
pub const WIRE_TAG: &str = "json";
/// Struct tag key marking reference fields.
pub const REF_TAG: &str = "ref";

/// Where in the input an error was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub unit: String,
    pub span: Option<Span>,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.unit)
    }
}

/// Errors that abort a package run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unsupported type expression shape.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A reference field's underlying type is not exported.
    #[error("reference field `{field}` must have an exported type, found `{type_name}`")]
    Export { field: String, type_name: String },

    /// One wire-name tag spans several field names.
    #[error("field list `{}` has {} identifiers for one tag", .names.join(", "), .names.len())]
    AmbiguousTag { names: Vec<String> },

    /// A name needed by generated code has no declaration or import.
    #[error("no {kind} found for `{name}`")]
    Lookup { name: String, kind: LookupKind },

    /// Two distinct types canonicalize to one wrapper name.
    #[error("wrapper `{wrapper}` would hold both `{first}` and `{second}`")]
    WrapperCollision {
        wrapper: String,
        first: String,
        second: String,
    },

    /// Unrecognized or incomplete reference annotation.
    #[error("field `{field}`: {message}")]
    Policy { field: String, message: String },

    /// Declaration text could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The sink rejected an artifact.
    #[error("failed to write `{artifact}`")]
    Sink {
        artifact: String,
        #[source]
        source: std::io::Error,
    },

    /// The sink could not publish a package's staged artifacts.
    #[error("failed to commit package `{package}`")]
    Commit {
        package: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location}: {source}")]
    Located {
        location: Location,
        #[source]
        source: Box<Error>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Declaration,
    Import,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::Declaration => f.write_str("declaration"),
            LookupKind::Import => f.write_str("import"),
        }
    }
}

impl Error {
    /// Attach a location unless one is already attached.
    pub fn at(self, unit: &str, span: Option<Span>) -> Self {
        match self {
            located @ Error::Located { .. } => located,
            error => Error::Located {
                location: Location {
                    unit: unit.to_string(),
                    span,
                },
                source: Box::new(error),
            },
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::Located { location, .. } => Some(location),
            _ => None,
        }
    }

    /// The error with any location wrapper removed.
    pub fn kind(&self) -> &Error {
        match self {
            Error::Located { source, .. } => source.kind(),
            error => error,
        }
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, Error>;
