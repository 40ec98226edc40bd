//! Macro extraction before block parsing and dispatch after it.
//!
//! A macro is a region from a line starting with `///` to a line ending with
//! `///`. Extraction swaps it for an empty-block line carrying a numbered
//! placeholder; the block parser passes that line through untouched and
//! [`reinsert`] later replaces it with the handler output.

use crate::delimiters::EMPTY_MARKER;
use crate::handlers::HandlerRegistry;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static MACRO_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^///(.*?)///$").unwrap());

static MACRO_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##########MACRO#([0-9]+)#$").unwrap());

pub const PLACEHOLDER_PREFIX: &str = "##########MACRO#";

/// Placeholder text left in the document for macro `id`.
pub fn placeholder(id: usize) -> String {
    format!("{}{}#", PLACEHOLDER_PREFIX, id)
}

/// Replace every macro region of `text` with a placeholder, pushing the raw
/// bodies onto `macros` in document order.
pub fn extract(text: &str, macros: &mut Vec<String>) -> String {
    MACRO_REGION
        .replace_all(text, |caps: &Captures| {
            let id = macros.len();
            macros.push(caps[1].to_string());
            format!("{}{}", EMPTY_MARKER, placeholder(id))
        })
        .into_owned()
}

/// Replace placeholders in rendered HTML with macro output.
pub fn reinsert(html: &str, macros: &[String], handlers: &HandlerRegistry) -> String {
    if macros.is_empty() {
        return html.to_string();
    }
    MACRO_PLACEHOLDER
        .replace_all(html, |caps: &Captures| {
            let Some(body) = caps[1].parse::<usize>().ok().and_then(|id| macros.get(id)) else {
                return caps[0].to_string();
            };
            expand(body, handlers)
        })
        .into_owned()
}

/// Run the handler named by the first word of `body`, or render the body as
/// escaped preformatted text when no handler matches.
pub fn expand(body: &str, handlers: &HandlerRegistry) -> String {
    let (first_line, rest) = body.split_once('\n').unwrap_or((body, ""));
    let first_line = first_line.trim();
    let name = first_line.split(' ').next().unwrap_or_default();

    if !name.is_empty()
        && let Some(handler) = handlers.macro_handler(name)
    {
        return handler.expand(rest, first_line);
    }

    log::debug!("No macro handler for {:?}, rendering as <pre>", name);
    format!("<pre>{}</pre>", html_escape::encode_text(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Handler;

    #[test]
    fn test_extract_replaces_regions() {
        let mut macros = Vec::new();
        let text = "before\n///html\n<b>x</b>\n///\nafter";
        let out = extract(text, &mut macros);
        assert_eq!(out, "before\nøøø##########MACRO#0#\nafter");
        assert_eq!(macros, vec!["html\n<b>x</b>\n".to_string()]);
    }

    #[test]
    fn test_extract_is_non_greedy() {
        let mut macros = Vec::new();
        let out = extract("///a\n1\n///\n\n///b\n2\n///", &mut macros);
        assert_eq!(macros.len(), 2);
        assert!(out.contains("MACRO#0#") && out.contains("MACRO#1#"));
    }

    #[test]
    fn test_unterminated_region_is_left_alone() {
        let mut macros = Vec::new();
        let out = extract("///html\nno end", &mut macros);
        assert_eq!(out, "///html\nno end");
        assert!(macros.is_empty());
    }

    #[test]
    fn test_builtin_html_macro() {
        let handlers = HandlerRegistry::with_builtins();
        assert_eq!(expand("html\n<b>x</b>\n", &handlers), "<b>x</b>\n");
    }

    #[test]
    fn test_unknown_macro_falls_back_to_pre() {
        let handlers = HandlerRegistry::with_builtins();
        assert_eq!(
            expand("graph a<b\n& c\n", &handlers),
            "<pre>graph a&lt;b\n&amp; c\n</pre>"
        );
    }

    #[test]
    fn test_handler_receives_first_line() {
        let mut handlers = HandlerRegistry::new();
        handlers
            .register(
                "macro:box",
                Handler::macro_fn(|body, first| format!("[{}]{}", first, body)),
            )
            .unwrap();
        assert_eq!(expand("box red\ninner", &handlers), "[box red]inner");
    }

    #[test]
    fn test_reinsert() {
        let handlers = HandlerRegistry::with_builtins();
        let macros = vec!["html\n<hr/>".to_string()];
        let html = "<p>a</p>\n##########MACRO#0#\n<p>b</p>";
        assert_eq!(reinsert(html, &macros, &handlers), "<p>a</p>\n<hr/>\n<p>b</p>");
        // unknown ids stay as they are
        let html = "##########MACRO#7#";
        assert_eq!(reinsert(html, &macros, &handlers), html);
    }
}
