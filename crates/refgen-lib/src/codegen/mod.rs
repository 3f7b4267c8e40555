//! Go code generation.
//!
//! - `wrapper` - reference wrapper types
//! - `plan` - per-aggregate marshal plans
//! - `marshal` - Go rendering of `MarshalJSON` / `UnmarshalJSON`
//! - `eval` - executes plans over JSON values with the generated code's semantics

pub mod eval;
pub mod marshal;
pub mod plan;
pub mod wrapper;


use refgen_core::{TypeBody, utils::quote};
use serde::Serialize;
use serde_json::Value;

use crate::context::TypeTable;
use crate::types::{TypeExpr, parser::parse_expr};
use crate::{Error, LookupKind, Result};

pub use eval::PlanEvaluator;
pub use plan::{FieldStep, MarshalPlan};

/// Indentation-aware line buffer for gofmt-shaped output.
#[derive(Debug, Default)]
pub struct GoWriter {
    output: String,
    indent: usize,
}

impl GoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Write `text` and indent what follows.
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedent and write `text`.
    pub fn close(&mut self, text: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Dedent, write `text`, and indent again, as for `} else {`.
    pub fn reopen(&mut self, text: &str) {
        self.close(text);
        self.indent += 1;
    }

    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// How generated code tests a value for its empty form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCheck {
    Nil,
    Len,
    String,
    Bool,
    Number,
    /// No empty form; always emitted.
    Opaque,
}

impl ZeroCheck {
    /// Go condition that holds when `expr` is non-empty, `None` when it always is.
    pub fn nonzero(self, expr: &str) -> Option<String> {
        match self {
            ZeroCheck::Nil => Some(format!("{expr} != nil")),
            ZeroCheck::Len => Some(format!("len({expr}) != 0")),
            ZeroCheck::String => Some(format!("{expr} != \"\"")),
            ZeroCheck::Bool => Some(expr.to_string()),
            ZeroCheck::Number => Some(format!("{expr} != 0")),
            ZeroCheck::Opaque => None,
        }
    }

    /// Whether `value` is the wire form of an empty Go value of this shape.
    pub fn is_zero(self, value: &Value) -> bool {
        match self {
            ZeroCheck::Nil => value.is_null(),
            ZeroCheck::Len => match value {
                Value::Null => true,
                Value::Array(items) => items.is_empty(),
                Value::Object(entries) => entries.is_empty(),
                _ => false,
            },
            ZeroCheck::String => value.as_str() == Some(""),
            ZeroCheck::Bool => value.as_bool() == Some(false),
            ZeroCheck::Number => value.as_f64() == Some(0.0),
            ZeroCheck::Opaque => false,
        }
    }

    /// Wire form of the Go zero value of this shape.
    pub fn zero_value(self) -> Value {
        match self {
            ZeroCheck::String => Value::String(String::new()),
            ZeroCheck::Bool => Value::Bool(false),
            ZeroCheck::Number => Value::from(0),
            ZeroCheck::Nil | ZeroCheck::Len | ZeroCheck::Opaque => Value::Null,
        }
    }
}

const NUMERIC_TYPES: &[&str] = &[
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Named types are followed through at most this many definitions.
const MAX_RESOLVE: usize = 32;

/// Classify `expr` for omitempty, following local named types through `types`.
pub fn zero_check(types: &TypeTable, expr: &TypeExpr) -> Result<ZeroCheck> {
    let mut current = expr.clone();
    for _ in 0..MAX_RESOLVE {
        let name = match &current {
            TypeExpr::Pointer { .. } => return Ok(ZeroCheck::Nil),
            TypeExpr::Slice { .. } | TypeExpr::Map { .. } => return Ok(ZeroCheck::Len),
            TypeExpr::Named {
                qualifier: Some(_), ..
            } => return Ok(ZeroCheck::Opaque),
            TypeExpr::Named {
                qualifier: None,
                name,
            } => name.clone(),
        };

        if let Some(check) = builtin_check(&name) {
            return Ok(check);
        }
        let Some(decl) = types.get(&name) else {
            return Err(Error::Lookup {
                name,
                kind: LookupKind::Declaration,
            });
        };
        current = match &decl.body {
            TypeBody::Struct(_) => return Ok(ZeroCheck::Opaque),
            TypeBody::Other(text) => match parse_expr(text) {
                Ok(underlying) => underlying,
                Err(_) => return Ok(unparsed_check(text).unwrap_or(ZeroCheck::Opaque)),
            },
        };
    }
    Ok(ZeroCheck::Opaque)
}

fn builtin_check(name: &str) -> Option<ZeroCheck> {
    match name {
        "string" => Some(ZeroCheck::String),
        "bool" => Some(ZeroCheck::Bool),
        "any" | "error" => Some(ZeroCheck::Nil),
        _ if NUMERIC_TYPES.contains(&name) => Some(ZeroCheck::Number),
        _ => None,
    }
}

/// Classify type text the expression grammar does not cover.
///
/// `None` for shapes with no known zero form, fixed-size arrays among them.
pub fn unparsed_check(text: &str) -> Option<ZeroCheck> {
    let text = text.trim_start();
    if text.starts_with('*') {
        Some(ZeroCheck::Nil)
    } else if text.starts_with("[]") || starts_with_keyword(text, "map") {
        Some(ZeroCheck::Len)
    } else if ["interface", "func", "chan"]
        .iter()
        .any(|kw| starts_with_keyword(text, kw))
    {
        Some(ZeroCheck::Nil)
    } else if starts_with_keyword(text, "struct") {
        Some(ZeroCheck::Opaque)
    } else {
        None
    }
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

/// Go literal for `text`: raw when possible, interpreted otherwise.
pub fn go_literal(text: &str) -> String {
    if text.contains('`') || text.contains('\r') {
        quote(text)
    } else {
        format!("`{text}`")
    }
}

/// The JSON object key prefix for `name`, e.g. `"a":`.
pub fn wire_key(name: &str) -> String {
    format!("{}:", Value::String(name.to_string()))
}
