//! Written-form and composite-name synthesis.
//!
//! Both walk the layers outside-in. Written form emits `*`, `[]`, and
//! `map[K]` tokens; composite names emit `PtrTo`, `ArrayOf`, and `MapOf<K>To`.
//! Outermost pointers name the same base as their pointee, so they add no
//! composite prefix: `*Msg` and `Msg` both name `Msg`.

use refgen_core::utils::capitalize;

use super::TypeExpr;

pub fn written_form(expr: &TypeExpr) -> String {
    let mut out = String::new();
    write_form(expr, &mut out);
    out
}

fn write_form(expr: &TypeExpr, out: &mut String) {
    match expr {
        TypeExpr::Named { qualifier, name } => {
            if let Some(q) = qualifier {
                out.push_str(q);
                out.push('.');
            }
            out.push_str(name);
        }
        TypeExpr::Pointer { inner } => {
            out.push('*');
            write_form(inner, out);
        }
        TypeExpr::Slice { inner } => {
            out.push_str("[]");
            write_form(inner, out);
        }
        TypeExpr::Map { key, value } => {
            out.push_str("map[");
            write_form(key, out);
            out.push(']');
            write_form(value, out);
        }
    }
}

/// Canonical base name used to name and deduplicate wrapper types.
pub fn composite_name(expr: &TypeExpr) -> String {
    let mut out = String::new();
    write_name(expr.strip_pointers(), &mut out);
    out
}

fn write_name(expr: &TypeExpr, out: &mut String) {
    match expr {
        TypeExpr::Named { name, .. } => {
            if out.is_empty() {
                out.push_str(name);
            } else {
                out.push_str(&capitalize(name));
            }
        }
        TypeExpr::Pointer { inner } => {
            out.push_str("PtrTo");
            write_name(inner, out);
        }
        TypeExpr::Slice { inner } => {
            out.push_str("ArrayOf");
            write_name(inner, out);
        }
        TypeExpr::Map { key, value } => {
            out.push_str("MapOf");
            out.push_str(&capitalize(&composite_name(key)));
            out.push_str("To");
            write_name(value, out);
        }
    }
}

/// Name of the wrapper type generated for `base`.
pub fn wrapper_name(base: &str) -> String {
    format!("{base}{}", crate::REF_SUFFIX)
}
