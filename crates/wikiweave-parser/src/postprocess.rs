//! Whole-document passes applied after block parsing.
//!
//! Each pass is a plain `&str -> String` function; the engine decides which
//! ones run and in which order.

use crate::delimiters::{ESCAPE, InlineKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Forced line-break token.
pub const LINE_BREAK: &str = "%%%";

static SPACE_BEFORE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(</p>|</li>|</pre>)").unwrap());

static SPACE_AFTER_LI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<li(?:\s[^>]*)?>)\s+").unwrap());

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(<p(?:\s[^>]*)?>)(.*?)(</p>)").unwrap());

/// Replace unescaped `%%%` with `<br />`.
pub fn line_breaks(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for (pos, token) in html.match_indices(LINE_BREAK) {
        out.push_str(&html[last..pos]);
        if html[..pos].ends_with(ESCAPE) {
            out.push_str(token);
        } else {
            out.push_str("<br />");
        }
        last = pos + token.len();
    }
    out.push_str(&html[last..]);
    out
}

/// Drop whitespace before closing `p`, `li` and `pre` tags and after `<li>`.
pub fn collapse_whitespace(html: &str) -> String {
    let html = SPACE_BEFORE_CLOSE.replace_all(html, "$1");
    SPACE_AFTER_LI.replace_all(&html, "$1").into_owned()
}

/// Restore escaped line-break tokens.
pub fn unescape_line_breaks(html: &str) -> String {
    html.replace(&format!("{}{}", ESCAPE, LINE_BREAK), LINE_BREAK)
}

/// Remove wiki-word markers no handler consumed.
pub fn strip_word_markers(html: &str) -> String {
    html.replace(InlineKind::Word.delimiters().0, "")
}

/// Insert `<br />` before every newline inside paragraphs.
///
/// Newlines already preceded by `<br />` are left alone, so one pass reaches
/// the fixed point.
pub fn auto_br(html: &str) -> String {
    PARAGRAPH
        .replace_all(html, |caps: &Captures| {
            let body = &caps[2];
            let mut out = String::with_capacity(body.len() + 16);
            for (i, segment) in body.split('\n').enumerate() {
                if i > 0 {
                    if !out.ends_with("<br />") {
                        out.push_str("<br />");
                    }
                    out.push('\n');
                }
                out.push_str(segment);
            }
            format!("{}{}{}", &caps[1], out, &caps[3])
        })
        .into_owned()
}

/// Move figures out of the paragraphs that wrap them.
///
/// Text before and after a figure stays in paragraphs of its own; empty
/// remainders are dropped. A link directly wrapping the figure moves out
/// with it. The scan position only moves forward, and the output holds no
/// paragraph containing a figure, so a second run changes nothing.
pub fn unwrap_figures(html: &str) -> String {
    if !html.contains("<figure") {
        return html.to_string();
    }
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = find_paragraph_open(rest) {
        let Some(open_len) = rest[start..].find('>').map(|i| i + 1) else {
            break;
        };
        let body_start = start + open_len;
        let Some(body_len) = rest[body_start..].find("</p>") else {
            break;
        };
        let body_end = body_start + body_len;
        let end = body_end + "</p>".len();

        out.push_str(&rest[..start]);
        let body = &rest[body_start..body_end];
        if body.contains("<figure") {
            out.push_str(&split_paragraph(&rest[start..body_start], body));
        } else {
            out.push_str(&rest[start..end]);
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

fn find_paragraph_open(html: &str) -> Option<usize> {
    html.match_indices("<p").map(|(i, _)| i).find(|&i| {
        matches!(
            html[i + 2..].chars().next(),
            Some('>') | Some(' ') | Some('\t') | Some('\n')
        )
    })
}

fn split_paragraph(open_tag: &str, body: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let push_text = |parts: &mut Vec<String>, text: &str| {
        if !text.trim().is_empty() {
            parts.push(format!("{}{}</p>", open_tag, text));
        }
    };

    let mut rest = body;
    while let Some(fig_start) = rest.find("<figure") {
        let Some(fig_len) = rest[fig_start..].find("</figure>") else {
            break;
        };
        let mut start = fig_start;
        let mut end = fig_start + fig_len + "</figure>".len();

        if let Some(link_start) = rest[..fig_start].rfind("<a ")
            && !rest[link_start + 1..fig_start].contains('<')
            && rest[..fig_start].ends_with('>')
            && rest[end..].starts_with("</a>")
        {
            start = link_start;
            end += "</a>".len();
        }

        push_text(&mut parts, &rest[..start]);
        parts.push(rest[start..end].to_string());
        rest = &rest[end..];
    }
    push_text(&mut parts, rest);
    parts.join("\n")
}
