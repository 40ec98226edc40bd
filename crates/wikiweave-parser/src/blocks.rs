//! Block-level state machine.
//!
//! Input is consumed line by line. Each line is classified into a [`Block`]
//! and compared with the previous line's block: a change emits the closing
//! markup of the previous block and the opening markup of the new one, while
//! a continuation of the same block only emits a newline. Line content is
//! handed to the [`InlineWalker`].
//!
//! Nothing here fails: unrecognized or malformed lines degrade to paragraph
//! text.

use crate::context::ParseContext;
use crate::delimiters::{EMPTY_MARKER, ESCAPE, LineKind, LineTable};
use crate::elements::attrs::split_fields;
use crate::inline::InlineWalker;
use crate::macros;
use regex::Regex;
use std::borrow::Cow;
use std::mem::discriminant;
use std::sync::LazyLock;
use wikiweave_core::WikiOptions;

// ============================================================================
// Line-level patterns
// ============================================================================

/// Trailing `§§child|parent§§` block attributes.
static BLOCK_ATTRS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)§§(.*)§§$").unwrap());

/// Space before high punctuation.
static FR_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ ]+([:?!;»](\s|$))").unwrap());

/// Space after an opening guillemet.
static FR_AFTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(«)[ ]+").unwrap());

// ============================================================================
// Block types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefItem {
    Term,
    Definition,
}

impl DefItem {
    fn tag(self) -> &'static str {
        match self {
            Self::Term => "dt",
            Self::Definition => "dd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsMode {
    Open,
    Close,
}

/// Block type of a line, with its nesting mode where one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Blank line, and the state before the first line.
    None,
    /// `øøø` line: content without a container.
    Empty,
    Paragraph,
    Title(u8),
    Hr,
    Quote,
    /// The literal marker run, e.g. `*#`.
    List(String),
    DefList(DefItem),
    Pre,
    Aside,
    Details(DetailsMode),
}

impl Block {
    fn same_kind(&self, other: &Block) -> bool {
        discriminant(self) == discriminant(other)
    }

    /// Whether French spacing applies to this block's content.
    fn is_typographic(&self) -> bool {
        !matches!(self, Block::None | Block::Empty | Block::Pre | Block::Hr)
    }
}

/// Attribute text from a `§§child|parent§§` suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BlockAttrs {
    child: String,
    parent: String,
}

impl BlockAttrs {
    fn child(&self) -> String {
        prefixed(&self.child)
    }

    fn parent(&self) -> String {
        prefixed(&self.parent)
    }
}

fn prefixed(attr: &str) -> String {
    let attr = attr.trim();
    if attr.is_empty() {
        String::new()
    } else {
        format!(" {}", attr)
    }
}

/// A classified input line.
#[derive(Debug)]
struct Line {
    block: Block,
    content: String,
    attrs: BlockAttrs,
    /// Line started with an escaped block marker.
    escaped: bool,
}

fn split_block_attrs(raw: &str) -> (&str, BlockAttrs) {
    let Some(caps) = BLOCK_ATTRS.captures(raw) else {
        return (raw, BlockAttrs::default());
    };
    let (Some(line), Some(attrs)) = (caps.get(1), caps.get(2)) else {
        return (raw, BlockAttrs::default());
    };
    let mut fields = split_fields(attrs.as_str()).into_iter();
    let attrs = BlockAttrs {
        child: fields.next().unwrap_or_default(),
        parent: fields.next().unwrap_or_default(),
    };
    (line.as_str(), attrs)
}

fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Non-breaking spaces around French high punctuation and guillemets.
pub fn french_typography(text: &str) -> String {
    let text = FR_BEFORE.replace_all(text, "&nbsp;$1");
    FR_AFTER.replace_all(&text, "$1&nbsp;").into_owned()
}

// ============================================================================
// Parser
// ============================================================================

pub struct BlockParser<'e> {
    lines: &'e LineTable,
    walker: &'e InlineWalker<'e>,
    options: &'e WikiOptions,
}

impl<'e> BlockParser<'e> {
    pub fn new(
        lines: &'e LineTable,
        walker: &'e InlineWalker<'e>,
        options: &'e WikiOptions,
    ) -> Self {
        Self {
            lines,
            walker,
            options,
        }
    }

    /// Render every line of `text` into HTML blocks.
    pub fn parse(&self, text: &str, ctx: &mut ParseContext) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        let mut prev = Block::None;
        let mut details_open = 0usize;

        for raw in text.split('\n') {
            let line = self.read_line(raw, &prev);

            let mut content = if line.block != Block::Pre || self.options.parse_pre {
                self.walker.walk(&line.content, ctx)
            } else {
                line.content.clone()
            };
            if line.escaped
                && let Some(rest) = content.strip_prefix(ESCAPE)
            {
                content = rest.to_string();
            }

            out.push_str(&close_line(&line.block, &prev));
            out.push_str(&open_line(&line, &prev, &mut details_open));

            if matches!(line.block, Block::Quote | Block::Aside)
                && line.block == prev
                && content.trim().is_empty()
            {
                out.push_str("</p>\n<p>");
            }
            if self.options.active_fr_syntax && line.block.is_typographic() {
                content = french_typography(&content);
            }
            out.push_str(&content);
            prev = line.block;
        }

        out.push_str(&close_line(&Block::None, &prev));
        for _ in 0..details_open {
            out.push_str("</details>\n");
        }
        out.trim().to_string()
    }

    fn read_line(&self, raw: &str, prev: &Block) -> Line {
        let (raw, attrs) = split_block_attrs(raw);
        let line = |block: Block, content: Cow<'_, str>| Line {
            block,
            content: content.into_owned(),
            attrs: attrs.clone(),
            escaped: false,
        };

        if raw.is_empty() {
            return line(Block::None, Cow::Borrowed(""));
        }
        if let Some(rest) = raw.strip_prefix(EMPTY_MARKER)
            && (self.lines.empty_enabled() || rest.starts_with(macros::PLACEHOLDER_PREFIX))
        {
            return line(Block::Empty, escape(rest.trim()));
        }
        if self.lines.is_escaped_marker(raw) {
            return Line {
                escaped: true,
                ..line(Block::Paragraph, escape(raw.trim()))
            };
        }

        let Some((kind, caps)) = self.lines.classify(raw) else {
            return line(Block::Paragraph, escape(raw.trim()));
        };
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        match kind {
            LineKind::Title => {
                let level = self.options.heading_level(group(1).len());
                line(Block::Title(level), escape(group(2).trim()))
            }
            LineKind::Hr => line(Block::Hr, Cow::Borrowed("")),
            LineKind::Quote => line(Block::Quote, escape(group(1).trim())),
            LineKind::List => {
                let mode = group(1);
                if list_transition_is_valid(mode, prev) {
                    line(Block::List(mode.to_string()), escape(group(2).trim()))
                } else {
                    let demoted = format!("<br />{}", escape(raw));
                    line(Block::Paragraph, Cow::Owned(demoted))
                }
            }
            LineKind::DefList => {
                let item = if group(1) == "=" {
                    DefItem::Term
                } else {
                    DefItem::Definition
                };
                line(Block::DefList(item), escape(group(2).trim()))
            }
            LineKind::Pre => line(Block::Pre, escape(group(1))),
            LineKind::Aside => line(Block::Aside, escape(group(1).trim())),
            LineKind::Details => {
                let summary = group(1).trim();
                let mode = if summary.is_empty() {
                    DetailsMode::Close
                } else {
                    DetailsMode::Open
                };
                line(Block::Details(mode), escape(summary))
            }
        }
    }
}

/// A list line may continue at the same mode, go one level deeper by
/// extending the previous mode, or go back up to any prefix of it.
fn list_transition_is_valid(mode: &str, prev: &Block) -> bool {
    let prev_mode = match prev {
        Block::List(p) => p.as_str(),
        _ => "",
    };
    let delta = mode.len() as isize - prev_mode.len() as isize;
    match delta {
        d if d < 0 => prev_mode.starts_with(mode),
        0 => mode == prev_mode,
        1 => mode.starts_with(prev_mode),
        _ => false,
    }
}

fn list_tag(marker: char) -> &'static str {
    if marker == '#' { "ol" } else { "ul" }
}

/// Closing markup for `prev` when `cur` does not continue it.
fn close_line(cur: &Block, prev: &Block) -> String {
    let changed = !cur.same_kind(prev)
        || matches!(prev, Block::Details(_))
        || matches!((cur, prev), (Block::Title(a), Block::Title(b)) if a != b);
    if !changed {
        return String::new();
    }

    match prev {
        Block::Paragraph => "</p>\n".to_string(),
        Block::Quote => "</p></blockquote>\n".to_string(),
        Block::Title(level) => format!("</h{}>\n", level),
        Block::Pre => "</pre>\n".to_string(),
        Block::Aside => "</p></aside>\n".to_string(),
        Block::Details(DetailsMode::Open) => "</summary>\n".to_string(),
        Block::Details(DetailsMode::Close) => String::new(),
        Block::DefList(item) => format!("</{}>\n</dl>\n", item.tag()),
        Block::List(mode) => mode
            .chars()
            .rev()
            .map(|marker| format!("</li>\n</{}>\n", list_tag(marker)))
            .collect(),
        Block::None | Block::Empty | Block::Hr => "\n".to_string(),
    }
}

/// Opening markup for `line` given the previous block.
fn open_line(line: &Line, prev: &Block, details_open: &mut usize) -> String {
    let opened = !line.block.same_kind(prev) || matches!(prev, Block::Details(_));
    let child = line.attrs.child();

    match &line.block {
        Block::Paragraph if opened => format!("\n<p{}>", child),
        Block::Quote if opened => format!("\n<blockquote{}><p>", child),
        Block::Title(level) if opened || line.block != *prev => {
            format!("\n<h{}{}>", level, child)
        }
        Block::Pre if opened => format!("\n<pre{}>", child),
        Block::Aside if opened => format!("\n<aside{}><p>", child),
        Block::Hr if opened => format!("\n<hr{} />", child),
        Block::Details(DetailsMode::Open) => {
            *details_open += 1;
            format!("\n<details{}><summary>", child)
        }
        Block::Details(DetailsMode::Close) => {
            if *details_open == 0 {
                return String::new();
            }
            *details_open -= 1;
            "\n</details>\n".to_string()
        }
        Block::List(mode) => open_list(mode, prev, &line.attrs),
        Block::DefList(item) => {
            let mut res = match prev {
                Block::DefList(prev_item) => format!("</{}>\n", prev_item.tag()),
                _ => format!("\n<dl{}>\n", line.attrs.parent()),
            };
            res.push_str(&format!("<{}{}>", item.tag(), child));
            res
        }
        _ => "\n".to_string(),
    }
}

fn open_list(mode: &str, prev: &Block, attrs: &BlockAttrs) -> String {
    let prev_mode = match prev {
        Block::List(p) => p.as_str(),
        _ => "",
    };
    let mut res = String::new();

    if mode.len() > prev_mode.len() {
        let marker = mode.chars().last().unwrap_or('*');
        res.push_str(&format!("<{}{}>\n", list_tag(marker), attrs.parent()));
    } else if mode.len() < prev_mode.len() {
        res.push_str("</li>\n");
        for marker in prev_mode.chars().rev().take(prev_mode.len() - mode.len()) {
            res.push_str(&format!("</{}>\n</li>\n", list_tag(marker)));
        }
    } else {
        res.push_str("</li>\n");
    }

    res.push_str(&format!("<li{}>", attrs.child()));
    res
}
