//! Source rewrites applied before block parsing.
//!
//! These passes only add wiki markup; rendering happens later through the
//! normal block and inline machinery.

use crate::delimiters::{DelimiterTable, ESCAPE, InlineKind};
use crate::lexer::{Token, source, tokenize};
use regex::Regex;
use std::sync::LazyLock;

static SETEXT_MAJOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(.+)\n={5,}$").unwrap());

static SETEXT_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(.+)\n-{5,}$").unwrap());

/// Turn underlined lines into `!!!` (`=====`) and `!!` (`-----`) titles.
pub fn setext_titles(text: &str) -> String {
    let text = SETEXT_MAJOR.replace_all(text, "!!!$1");
    SETEXT_MINOR.replace_all(&text, "!!$1").into_owned()
}

/// Wrap every match of `pattern` that stands alone between non-alphanumeric
/// characters in wiki-word markers.
pub fn wrap_wiki_words(text: &str, pattern: &Regex) -> String {
    let marker = InlineKind::Word.delimiters().0;
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in pattern.find_iter(text) {
        if m.is_empty() {
            continue;
        }
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(|c| c.is_ascii_alphanumeric())
            || after.is_some_and(|c| c.is_ascii_alphanumeric())
        {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(marker);
        out.push_str(m.as_str());
        out.push_str(marker);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Rewrite bare URLs into `[url]` links.
///
/// URLs already inside link or image markup are left alone. Markup never
/// spans lines, so an opener only protects text up to its first closer on the
/// same line. When explicit links are disabled, author brackets are escaped first
/// so only detected URLs become links.
pub fn auto_urls(
    text: &str,
    pattern: &Regex,
    delimiters: &DelimiterTable,
    urls_enabled: bool,
) -> String {
    let escaped: String;
    let text = if urls_enabled {
        text
    } else {
        escaped = escape_brackets(text);
        &escaped
    };

    let (link_open, link_close) = InlineKind::Link.delimiters();
    let (image_open, image_close) = InlineKind::Image.delimiters();
    let mut out = String::with_capacity(text.len() + 16);

    for line in text.split_inclusive('\n') {
        let tokens = tokenize(line, delimiters.all());
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Delim(d) => {
                    let closer = if d == link_open {
                        Some(link_close)
                    } else if d == image_open {
                        Some(image_close)
                    } else {
                        None
                    };
                    // pair with the first closer, as the inline walker does
                    let end = closer.and_then(|closer| {
                        tokens[i + 1..]
                            .iter()
                            .position(|t| *t == Token::Delim(closer))
                            .map(|offset| i + 1 + offset)
                    });
                    match end {
                        Some(end) => {
                            out.push_str(&source(&tokens[i..=end]));
                            i = end;
                        }
                        None => out.push_str(d),
                    }
                }
                Token::Text(t) => out.push_str(&link_urls(t, pattern)),
            }
            i += 1;
        }
    }
    out
}

fn link_urls(text: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.is_empty() || matches!(text[..m.start()].chars().next_back(), Some('[' | '|')) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push('[');
        out.push_str(m.as_str());
        out.push(']');
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn escape_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '[' || c == ']' {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}
