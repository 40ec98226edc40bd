//! Field splitting and attribute protection shared by the element renderers.

use crate::delimiters::ESCAPE;
use regex::Regex;
use std::sync::LazyLock;

static NAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").unwrap());

/// Trailing `§attr§` suffix of an inline element's content.
static INLINE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)§([^§]*)§$").unwrap());

/// Split element content on `|` not preceded by the escape prefix.
///
/// Escaped pipes are restored to plain `|` in the returned fields.
pub fn split_fields(content: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Field `index`, or `""` when absent.
pub fn field(fields: &[String], index: usize) -> &str {
    fields.get(index).map(String::as_str).unwrap_or_default()
}

/// Escape quotes for use inside a double-quoted attribute value.
pub fn protect_attr(value: &str) -> String {
    value.replace('"', "&quot;").replace('\'', "&#039;")
}

/// Accept `value` as an identifier-like token (`lang`, `id`), or drop it.
pub fn protect_name(value: &str) -> Option<&str> {
    let value = value.trim();
    NAME_TOKEN.is_match(value).then_some(value)
}

/// Neutralize script URLs.
pub fn protect_url(url: &str) -> &str {
    if url.trim_start().to_ascii_lowercase().starts_with("javascript:") {
        "#"
    } else {
        url
    }
}

/// Split a trailing `§attr§` suffix off element content.
pub fn split_inline_attr(content: &str) -> (&str, Option<&str>) {
    match INLINE_ATTR.captures(content) {
        Some(caps) => {
            let (Some(body), Some(attr)) = (caps.get(1), caps.get(2)) else {
                return (content, None);
            };
            let attr = attr.as_str().trim();
            (body.as_str(), (!attr.is_empty()).then_some(attr))
        }
        None => (content, None),
    }
}

/// Ordered HTML attribute list; values are quote-protected on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(&'static str, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.push((name, value.into()));
        self
    }

    /// Push only when `value` is non-empty.
    pub fn push_nonempty(&mut self, name: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(name, value);
        }
        self
    }

    /// ` name="value"` pairs in insertion order.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, protect_attr(value)))
            .collect()
    }
}
