//! Pre-configured option sets for the usual places wiki markup is accepted
//!
//! - Full: every construct enabled (engine defaults)
//! - Post: blog entries, defaults without French typography
//! - Comments: reader comments, no structural or raw-HTML constructs
//! - SimpleComments: plain text with automatic links and line breaks

use crate::config::WikiOptions;
use crate::error::{Error, Result};
use std::str::FromStr;

/// Profile selector for pre-configured option sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserProfile {
    /// Full: engine defaults, every construct enabled
    #[default]
    Full,
    /// Post: blog entry bodies
    Post,
    /// Comments: inline formatting, lists and quotes only
    Comments,
    /// SimpleComments: auto links and line breaks only
    SimpleComments,
}

impl ParserProfile {
    /// Create a WikiOptions from this profile
    pub fn create_options(self) -> WikiOptions {
        let mut opts = WikiOptions::new();

        match self {
            Self::Full => {}

            Self::Post => {
                opts.active_auto_urls = false;
                opts.active_fr_syntax = false;
            }

            Self::Comments => {
                opts.active_title = false;
                opts.active_setext_title = false;
                opts.active_hr = false;
                opts.active_defl = false;
                opts.active_empty = false;
                opts.active_aside = false;
                opts.active_details = false;
                opts.active_auto_urls = true;
                opts.active_auto_br = true;
                opts.active_auto_img = false;
                opts.active_img = false;
                opts.active_anchor = false;
                opts.active_inline_html = false;
                opts.active_footnotes = false;
                opts.active_wikiwords = false;
                opts.active_macros = false;
                opts.active_fr_syntax = false;
                opts.parse_pre = false;
            }

            Self::SimpleComments => {
                opts.active_title = false;
                opts.active_setext_title = false;
                opts.active_hr = false;
                opts.active_lists = false;
                opts.active_defl = false;
                opts.active_quote = false;
                opts.active_pre = false;
                opts.active_empty = false;
                opts.active_aside = false;
                opts.active_details = false;
                opts.active_auto_urls = true;
                opts.active_auto_br = true;
                opts.active_urls = false;
                opts.active_auto_img = false;
                opts.active_img = false;
                opts.active_anchor = false;
                opts.active_em = false;
                opts.active_strong = false;
                opts.active_br = false;
                opts.active_q = false;
                opts.active_code = false;
                opts.active_acronym = false;
                opts.active_ins = false;
                opts.active_del = false;
                opts.active_inline_html = false;
                opts.active_footnotes = false;
                opts.active_wikiwords = false;
                opts.active_macros = false;
                opts.active_mark = false;
                opts.active_sup = false;
                opts.active_sub = false;
                opts.active_i = false;
                opts.active_span = false;
                opts.active_fr_syntax = false;
                opts.parse_pre = false;
            }
        }

        opts
    }

    /// Get profile name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Post => "post",
            Self::Comments => "comments",
            Self::SimpleComments => "simple-comments",
        }
    }
}

impl FromStr for ParserProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "full" | "default" => Ok(Self::Full),
            "post" | "posts" | "entry" => Ok(Self::Post),
            "comments" | "comment" => Ok(Self::Comments),
            "simple-comments" | "simple" => Ok(Self::SimpleComments),
            other => Err(Error::config_error(format!("Unknown profile: {}", other))),
        }
    }
}
