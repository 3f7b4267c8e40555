//! Go struct tag lookup.
//!
//! A tag is a space-separated list of `key:"value"` pairs where the value is
//! a Go interpreted string literal. Malformed trailing input ends the scan,
//! so a key after a syntax error is never found.

use crate::utils::unquote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a> {
    raw: &'a str,
}

impl<'a> StructTag<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Value stored under `key`, unquoted. `None` when absent or malformed.
    pub fn get(&self, key: &str) -> Option<String> {
        self.pairs()
            .find(|(name, _)| *name == key)
            .and_then(|(_, quoted)| unquote(quoted))
    }

    /// `(key, quoted value)` pairs in order of appearance.
    pub fn pairs(&self) -> Pairs<'a> {
        Pairs { rest: self.raw }
    }
}

pub struct Pairs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.rest.trim_start_matches(' ');
        let bytes = tag.as_bytes();

        let mut i = 0;
        while i < bytes.len()
            && bytes[i] > b' '
            && bytes[i] != b':'
            && bytes[i] != b'"'
            && bytes[i] != 0x7f
        {
            i += 1;
        }
        if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
            self.rest = "";
            return None;
        }
        let name = &tag[..i];
        let tag = &tag[i + 1..];
        let bytes = tag.as_bytes();

        let mut j = 1;
        while j < bytes.len() && bytes[j] != b'"' {
            if bytes[j] == b'\\' {
                j += 1;
            }
            j += 1;
        }
        if j >= bytes.len() {
            self.rest = "";
            return None;
        }

        self.rest = &tag[j + 1..];
        Some((name, &tag[..=j]))
    }
}
