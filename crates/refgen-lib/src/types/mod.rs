//! Type expressions and their canonical descriptors.
//!
//! - `parser` - recursive descent over the closed grammar
//!   `Name | Qualified.Name | *Type | []Type | map[Type]Type`
//! - `naming` - written form and composite base name synthesis

pub mod naming;
pub mod parser;

#[cfg(test)]
mod naming_tests;

use serde::Serialize;

pub use parser::parse;

/// Structural form of a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Named {
        /// Package path prefix for qualified names (`pkg` in `pkg.Msg`).
        #[serde(skip_serializing_if = "Option::is_none")]
        qualifier: Option<String>,
        name: String,
    },
    Pointer {
        inner: Box<TypeExpr>,
    },
    Slice {
        inner: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Named {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer {
            inner: Box::new(inner),
        }
    }

    pub fn slice(inner: TypeExpr) -> Self {
        TypeExpr::Slice {
            inner: Box::new(inner),
        }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Innermost named type on the value spine.
    pub fn innermost(&self) -> (&Option<String>, &str) {
        match self {
            TypeExpr::Named { qualifier, name } => (qualifier, name),
            TypeExpr::Pointer { inner } | TypeExpr::Slice { inner } => inner.innermost(),
            TypeExpr::Map { value, .. } => value.innermost(),
        }
    }

    /// The expression with outermost pointer layers removed.
    pub fn strip_pointers(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer { inner } => inner.strip_pointers(),
            other => other,
        }
    }

    /// Pointer, slice, or map at the outermost layer.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, TypeExpr::Named { .. })
    }

    /// Visit every named type, map keys included, outside-in.
    pub fn for_each_named<'a>(&'a self, f: &mut impl FnMut(Option<&'a str>, &'a str)) {
        match self {
            TypeExpr::Named { qualifier, name } => f(qualifier.as_deref(), name),
            TypeExpr::Pointer { inner } | TypeExpr::Slice { inner } => inner.for_each_named(f),
            TypeExpr::Map { key, value } => {
                key.for_each_named(f);
                value.for_each_named(f);
            }
        }
    }

    /// Written Go syntax.
    pub fn render(&self) -> String {
        naming::written_form(self)
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Canonical descriptor for one occurrence of a type expression.
///
/// `indirection` and `dims` count pointer and slice layers along the value
/// spine. For maps, the descriptor describes the value side and `map_key`
/// holds the key's own descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub written: String,
    pub base: String,
    pub indirection: usize,
    pub dims: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_key: Option<Box<Identifier>>,
    #[serde(skip)]
    pub expr: TypeExpr,
}

impl Identifier {
    pub fn from_expr(expr: TypeExpr) -> Self {
        let (indirection, dims, map_key) = spine_counts(&expr);
        Self {
            written: naming::written_form(&expr),
            base: naming::composite_name(&expr),
            indirection,
            dims,
            map_key: map_key.map(|key| Box::new(Identifier::from_expr(key.clone()))),
            expr,
        }
    }

    pub fn nullable(&self) -> bool {
        self.indirection > 0 || self.dims > 0 || self.map_key.is_some()
    }

    /// Innermost type name, unqualified.
    pub fn name(&self) -> &str {
        self.expr.innermost().1
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.expr.innermost().0.as_deref()
    }

    pub fn is_exported(&self) -> bool {
        refgen_core::utils::is_exported(self.name())
    }
}

fn spine_counts(expr: &TypeExpr) -> (usize, usize, Option<&TypeExpr>) {
    let mut indirection = 0;
    let mut dims = 0;
    let mut map_key = None;
    let mut cursor = expr;
    loop {
        match cursor {
            TypeExpr::Named { .. } => return (indirection, dims, map_key),
            TypeExpr::Pointer { inner } => {
                indirection += 1;
                cursor = inner;
            }
            TypeExpr::Slice { inner } => {
                dims += 1;
                cursor = inner;
            }
            TypeExpr::Map { key, value } => {
                map_key.get_or_insert(key.as_ref());
                cursor = value;
            }
        }
    }
}

/// Unsupported or malformed type expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported type expression `{expr}`: {message}")]
pub struct SyntaxError {
    pub expr: String,
    pub message: String,
    /// Byte offset of the offending token within `expr`.
    pub offset: usize,
}
