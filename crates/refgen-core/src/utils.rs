/// Uppercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use refgen_core::utils::capitalize;
/// assert_eq!(capitalize("string"), "String");
/// assert_eq!(capitalize("RawMessage"), "RawMessage");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Go visibility rule: an identifier is exported when it starts with an
/// uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// `v2`, `v10`, ... as used for major-version import path segments.
pub fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Predeclared Go type names.
pub const PREDECLARED_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

pub fn is_predeclared_type(name: &str) -> bool {
    PREDECLARED_TYPES.contains(&name)
}

/// Decode a Go string literal, interpreted (`"..."`) or raw (`` `...` ``).
///
/// Returns `None` for malformed literals.
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(inner) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        // Carriage returns are discarded from raw literals.
        return Some(inner.replace('\r', ""));
    }

    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => out.push(unescape(&mut chars)?),
            c => out.push(c),
        }
    }
    Some(out)
}

fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let c = chars.next()?;
    let decoded = match c {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0b}',
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        'x' => hex_char(chars, 2)?,
        'u' => hex_char(chars, 4)?,
        'U' => hex_char(chars, 8)?,
        '0'..='7' => {
            let mut value = c.to_digit(8)?;
            for _ in 0..2 {
                value = value * 8 + chars.next()?.to_digit(8)?;
            }
            if value > 0xff {
                return None;
            }
            char::from_u32(value)?
        }
        _ => return None,
    };
    Some(decoded)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

/// Encode `s` as a Go interpreted string literal.
///
/// # Examples
/// ```
/// use refgen_core::utils::quote;
/// assert_eq!(quote("a\"b"), r#""a\"b""#);
/// ```
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
