//! # Wikiweave Parser
//!
//! Converts wiki markup into an HTML fragment.
//!
//! This crate provides:
//! - A block-level state machine (paragraphs, titles, lists, quotes, asides,
//!   collapsible details, definition lists, preformatted text, rules)
//! - An inline walker pairing delimiters with escaping, nesting, attribute
//!   suffixes, footnotes and acronym lookup
//! - Macros extracted before parsing and expanded by registered handlers
//! - Post-processing: line breaks, automatic `<br />`, figure unwrapping
//!
//! ## Architecture
//!
//! ```text
//! text ─► macros::extract ─► preprocess (setext, wiki words, auto-URLs)
//!      ─► blocks::BlockParser ──(per line)──► inline::InlineWalker ─► elements
//!      ─► postprocess ─► macros::reinsert ─► footnotes
//! ```
//!
//! [`WikiParser`] holds the configuration and is immutable during a
//! `transform` call; per-call state lives in [`context::ParseContext`].
//!
//! ## Quick Start
//!
//! ```
//! use wikiweave_parser::WikiParser;
//!
//! let parser = WikiParser::new();
//! let html = parser.transform("!!! Title\n\n* one\n* two");
//! assert!(html.starts_with("<h3>Title</h3>"));
//! assert!(html.contains("<li>one</li>"));
//! ```
//!
//! ## Extension Points
//!
//! ```
//! use wikiweave_parser::WikiParser;
//!
//! let mut parser = WikiParser::new();
//! parser
//!     .register_macro("shout", |body, _first_line| body.trim().to_uppercase())
//!     .unwrap();
//! assert_eq!(parser.transform("///shout\nhello\n///"), "HELLO");
//! ```

pub mod blocks;
pub mod context;
pub mod delimiters;
pub mod elements;
mod engine;
pub mod handlers;
pub mod inline;
pub mod lexer;
pub mod macros;
pub mod postprocess;
pub mod preprocess;

pub use context::{FootnoteCollector, ParseContext};
pub use delimiters::{DelimiterTable, InlineKind, LineKind, LineTable};
pub use engine::WikiParser;
pub use handlers::{
    Handler, HandlerKey, HandlerRegistry, ImageSizeProvider, LinkTarget, MacroHandler, UrlHandler,
    WikiWordHandler,
};

pub use wikiweave_core::{
    AcronymTable, Error, OptionValue, ParserProfile, Result, WikiOptions,
};

/// Convenience re-exports
pub mod prelude {
    pub use crate::WikiParser;
    pub use crate::handlers::{Handler, ImageSizeProvider, LinkTarget};
    pub use wikiweave_core::prelude::*;
}
