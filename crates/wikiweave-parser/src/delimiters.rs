//! Delimiter and line-type tables derived from [`WikiOptions`].
//!
//! Disabling a feature removes its entry entirely, so a disabled inline
//! element's delimiters are plain text and a disabled block marker falls
//! through to paragraph classification.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;
use wikiweave_core::WikiOptions;

/// Prefix that suppresses recognition of the delimiter or marker it precedes.
pub const ESCAPE: char = '\\';

/// Inline element kinds, in split-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    Em,
    Strong,
    Acronym,
    Link,
    Image,
    Quote,
    Code,
    Anchor,
    Del,
    Ins,
    InlineHtml,
    Note,
    Word,
    Mark,
    Sup,
    Sub,
    Italic,
    Span,
}

impl InlineKind {
    pub const ALL: [InlineKind; 18] = [
        Self::Em,
        Self::Strong,
        Self::Acronym,
        Self::Link,
        Self::Image,
        Self::Quote,
        Self::Code,
        Self::Anchor,
        Self::Del,
        Self::Ins,
        Self::InlineHtml,
        Self::Note,
        Self::Word,
        Self::Mark,
        Self::Sup,
        Self::Sub,
        Self::Italic,
        Self::Span,
    ];

    /// Elements recognized inside link labels.
    pub const LINK_SAFE: [InlineKind; 12] = [
        Self::Acronym,
        Self::Image,
        Self::Em,
        Self::Strong,
        Self::Italic,
        Self::Code,
        Self::Del,
        Self::Ins,
        Self::Mark,
        Self::Sup,
        Self::Sub,
        Self::Span,
    ];

    /// Opening and closing delimiter.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Em => ("''", "''"),
            Self::Strong => ("__", "__"),
            Self::Acronym => ("??", "??"),
            Self::Link => ("[", "]"),
            Self::Image => ("((", "))"),
            Self::Quote => ("{{", "}}"),
            Self::Code => ("@@", "@@"),
            Self::Anchor => ("~", "~"),
            Self::Del => ("--", "--"),
            Self::Ins => ("++", "++"),
            Self::InlineHtml => ("``", "``"),
            Self::Note => ("$$", "$$"),
            Self::Word => ("¶¶¶", "¶¶¶"),
            Self::Mark => ("\"\"", "\"\""),
            Self::Sup => ("^", "^"),
            Self::Sub => (",,", ",,"),
            Self::Italic => ("££", "££"),
            Self::Span => (";;", ";;"),
        }
    }

    /// HTML tag emitted for the element, empty for elements rendered untagged.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Em => "em",
            Self::Strong => "strong",
            Self::Acronym => "abbr",
            Self::Link | Self::Anchor => "a",
            Self::Image => "img",
            Self::Quote => "q",
            Self::Code => "code",
            Self::Del => "del",
            Self::Ins => "ins",
            Self::InlineHtml | Self::Note | Self::Word => "",
            Self::Mark => "mark",
            Self::Sup => "sup",
            Self::Sub => "sub",
            Self::Italic => "i",
            Self::Span => "span",
        }
    }

    fn enabled(self, options: &WikiOptions) -> bool {
        match self {
            // auto-URL detection rewrites bare URLs into link syntax
            Self::Link => options.active_urls || options.active_auto_urls,
            Self::Em => options.active_em,
            Self::Strong => options.active_strong,
            Self::Acronym => options.active_acronym,
            Self::Image => options.active_img,
            Self::Quote => options.active_q,
            Self::Code => options.active_code,
            Self::Anchor => options.active_anchor,
            Self::Del => options.active_del,
            Self::Ins => options.active_ins,
            Self::InlineHtml => options.active_inline_html,
            Self::Note => options.active_footnotes,
            Self::Word => options.active_wikiwords,
            Self::Mark => options.active_mark,
            Self::Sup => options.active_sup,
            Self::Sub => options.active_sub,
            Self::Italic => options.active_i,
            Self::Span => options.active_span,
        }
    }
}

/// Enabled inline elements and the union of their delimiters.
#[derive(Debug, Clone)]
pub struct DelimiterTable {
    entries: Vec<(InlineKind, &'static str, &'static str)>,
    all: Vec<&'static str>,
}

impl DelimiterTable {
    pub fn from_options(options: &WikiOptions) -> Self {
        let entries: Vec<_> = InlineKind::ALL
            .iter()
            .filter(|kind| kind.enabled(options))
            .map(|&kind| {
                let (open, close) = kind.delimiters();
                (kind, open, close)
            })
            .collect();

        let mut all: Vec<&'static str> = Vec::with_capacity(entries.len() * 2);
        for &(_, open, close) in &entries {
            for delim in [open, close] {
                if !all.contains(&delim) {
                    all.push(delim);
                }
            }
        }

        Self { entries, all }
    }

    pub fn is_enabled(&self, kind: InlineKind) -> bool {
        self.entries.iter().any(|(k, _, _)| *k == kind)
    }

    /// Element opened by this delimiter token, if any.
    pub fn opener(&self, token: &str) -> Option<InlineKind> {
        self.entries
            .iter()
            .find(|(_, open, _)| *open == token)
            .map(|(kind, _, _)| *kind)
    }

    pub fn closer(&self, kind: InlineKind) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _, _)| *k == kind)
            .map(|(_, _, close)| *close)
    }

    /// Every enabled delimiter, deduplicated, in split-priority order.
    pub fn all(&self) -> &[&'static str] {
        &self.all
    }

    /// Strip the escape prefix from escaped delimiters.
    pub fn unescape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(ESCAPE) {
            return Cow::Borrowed(text);
        }
        let mut out = text.to_string();
        for delim in &self.all {
            let escaped = format!("{}{}", ESCAPE, delim);
            if out.contains(&escaped) {
                out = out.replace(&escaped, delim);
            }
        }
        Cow::Owned(out)
    }
}

lazy_static! {
    static ref TITLE_LINE: Regex = Regex::new(r"^(!{1,4})(.*)$").unwrap();
    static ref HR_LINE: Regex = Regex::new(r"^-{4}[- ]*$").unwrap();
    static ref QUOTE_LINE: Regex = Regex::new(r"^(?:>|;:)(.*)$").unwrap();
    static ref LIST_LINE: Regex = Regex::new(r"^([*#]+)(.*)$").unwrap();
    static ref DEFL_LINE: Regex = Regex::new(r"^([=:]) (.*)$").unwrap();
    static ref PRE_LINE: Regex = Regex::new(r"^ (.*)$").unwrap();
    static ref ASIDE_LINE: Regex = Regex::new(r"^\)(.*)$").unwrap();
    static ref DETAILS_LINE: Regex = Regex::new(r"^\|(.*)$").unwrap();
}

/// Marker of a block that opens no container.
pub const EMPTY_MARKER: &str = "øøø";

/// Block line types recognized by a line prefix, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Hr,
    Quote,
    List,
    DefList,
    Pre,
    Aside,
    Details,
}

impl LineKind {
    pub const ALL: [LineKind; 8] = [
        Self::Title,
        Self::Hr,
        Self::Quote,
        Self::List,
        Self::DefList,
        Self::Pre,
        Self::Aside,
        Self::Details,
    ];

    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Title => &*TITLE_LINE,
            Self::Hr => &*HR_LINE,
            Self::Quote => &*QUOTE_LINE,
            Self::List => &*LIST_LINE,
            Self::DefList => &*DEFL_LINE,
            Self::Pre => &*PRE_LINE,
            Self::Aside => &*ASIDE_LINE,
            Self::Details => &*DETAILS_LINE,
        }
    }

    fn enabled(self, options: &WikiOptions) -> bool {
        match self {
            Self::Title => options.active_title,
            Self::Hr => options.active_hr,
            Self::Quote => options.active_quote,
            Self::List => options.active_lists,
            Self::DefList => options.active_defl,
            Self::Pre => options.active_pre,
            Self::Aside => options.active_aside,
            Self::Details => options.active_details,
        }
    }
}

/// Enabled block line types.
#[derive(Debug, Clone)]
pub struct LineTable {
    kinds: Vec<LineKind>,
    empty: bool,
}

impl LineTable {
    pub fn from_options(options: &WikiOptions) -> Self {
        Self {
            kinds: LineKind::ALL
                .into_iter()
                .filter(|kind| kind.enabled(options))
                .collect(),
            empty: options.active_empty,
        }
    }

    pub fn empty_enabled(&self) -> bool {
        self.empty
    }

    /// First enabled line type whose prefix pattern matches.
    pub fn classify<'l>(&self, line: &'l str) -> Option<(LineKind, Captures<'l>)> {
        self.kinds
            .iter()
            .find_map(|&kind| kind.pattern().captures(line).map(|caps| (kind, caps)))
    }

    /// Whether `line` is a block marker preceded by the escape prefix.
    ///
    /// Leading-space preformatted lines are exempt: an escaped space is not
    /// a meaningful marker.
    pub fn is_escaped_marker(&self, line: &str) -> bool {
        let Some(rest) = line.strip_prefix(ESCAPE) else {
            return false;
        };
        if self.empty && rest.starts_with(EMPTY_MARKER) {
            return true;
        }
        self.kinds
            .iter()
            .filter(|kind| **kind != LineKind::Pre)
            .any(|kind| kind.pattern().is_match(rest))
    }
}
