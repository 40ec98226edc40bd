//! Capture-split tokenizer for inline markup.
//!
//! Splits a line on the union of enabled delimiters, keeping each delimiter
//! as its own token. A delimiter immediately preceded by the escape prefix
//! stays inside the surrounding text token.

use crate::delimiters::ESCAPE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Delim(&'a str),
}

impl<'a> Token<'a> {
    /// Source text of the token
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Text(s) | Token::Delim(s) => s,
        }
    }
}

/// Split `text` into text and delimiter tokens.
///
/// At each position the first delimiter of `delimiters` (in order) that
/// matches wins, so callers control priority between overlapping delimiters.
pub fn tokenize<'a>(text: &'a str, delimiters: &[&str]) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;
    let mut prev: Option<char> = None;

    while pos < text.len() {
        let rest = &text[pos..];
        let matched = if prev == Some(ESCAPE) {
            None
        } else {
            delimiters.iter().find(|d| !d.is_empty() && rest.starts_with(**d))
        };

        if let Some(delim) = matched {
            if text_start < pos {
                tokens.push(Token::Text(&text[text_start..pos]));
            }
            let end = pos + delim.len();
            tokens.push(Token::Delim(&text[pos..end]));
            prev = delim.chars().last();
            pos = end;
            text_start = end;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        prev = Some(ch);
        pos += ch.len_utf8();
    }

    if text_start < text.len() {
        tokens.push(Token::Text(&text[text_start..]));
    }
    tokens
}

/// Concatenated source text of a token run
pub fn source(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(Token::as_str).collect()
}
