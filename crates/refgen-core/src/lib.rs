#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for refgen declaration input.
//!
//! A processing run receives a package as a list of [`SourceUnit`]s. Each unit
//! carries its package clause, imports, and the type declarations found in it.
//! Front ends build these either by reading Go source or programmatically.

use serde::{Deserialize, Serialize};

pub mod struct_tag;
pub mod utils;

#[cfg(test)]
mod struct_tag_tests;

pub use struct_tag::StructTag;

/// Byte range into a unit's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn range(self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Smallest span covering both.
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// One import clause: `alias "path"` or `"path"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }

    /// Name the importing unit uses to qualify this package's identifiers.
    ///
    /// Without an alias this is the last path segment, skipping a `vN` major
    /// version segment and dropping a `.vN` suffix (`gopkg.in/yaml.v3` → `yaml`).
    pub fn qualifier(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        let mut segments = self.path.rsplit('/');
        let mut last = segments.next().unwrap_or(&self.path);
        if utils::is_major_version(last) {
            if let Some(prev) = segments.next() {
                last = prev;
            }
        }
        match last.rsplit_once('.') {
            Some((stem, version)) if utils::is_major_version(version) => stem,
            _ => last,
        }
    }
}

/// A single struct field line. `names` is empty for embedded fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub names: Vec<String>,
    /// Type expression text as written.
    pub ty: String,
    /// Struct tag contents, already unquoted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty_span: Option<Span>,
}

impl Field {
    pub fn new<N: Into<String>>(
        names: impl IntoIterator<Item = N>,
        ty: impl Into<String>,
    ) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ty: ty.into(),
            tag: None,
            ty_span: None,
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.ty_span = Some(span);
        self
    }

    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    pub fn struct_tag(&self) -> StructTag<'_> {
        StructTag::new(self.tag.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum TypeBody {
    Struct(Vec<Field>),
    /// Any non-struct underlying type, kept as written.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// `type A = B` rather than `type A B`.
    #[serde(default)]
    pub alias: bool,
    pub body: TypeBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl TypeDecl {
    pub fn structure(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            alias: false,
            body: TypeBody::Struct(fields),
            span: None,
        }
    }

    pub fn other(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: false,
            body: TypeBody::Other(ty.into()),
            span: None,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match &self.body {
            TypeBody::Struct(fields) => Some(fields),
            TypeBody::Other(_) => None,
        }
    }
}

/// One source file's worth of declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// File name, used to name the unit's rewritten output.
    pub name: String,
    pub package: String,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub decls: Vec<TypeDecl>,
    /// Original text; spans index into it.
    #[serde(default, skip_serializing)]
    pub source: Option<String>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            imports: Vec::new(),
            decls: Vec::new(),
            source: None,
        }
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn decl(mut self, decl: TypeDecl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Import whose qualifier is `name`, if the unit has one.
    pub fn resolve_qualifier(&self, name: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.qualifier() == name)
    }
}
