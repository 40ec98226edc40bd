//! # Wikiweave
//!
//! Wiki markup to HTML conversion: the engine from `wikiweave-parser`, the
//! option registry from `wikiweave-core`, and [`ParserBuilder`] for
//! assembling a parser from a profile, option files and overrides.
//!
//! ```
//! use wikiweave::{ParserBuilder, ParserProfile};
//!
//! let parser = ParserBuilder::new(ParserProfile::Post)
//!     .set("active_auto_br", true)
//!     .build()
//!     .unwrap();
//! assert_eq!(parser.transform("a\nb"), "<p>a<br />\nb</p>");
//! ```

pub mod builder;

pub use builder::ParserBuilder;
pub use wikiweave_core::prelude::*;
pub use wikiweave_parser::{
    Handler, HandlerKey, HandlerRegistry, ImageSizeProvider, LinkTarget, MacroHandler, UrlHandler,
    WikiParser, WikiWordHandler,
};

/// Convert `text` with a default parser.
///
/// Builds a fresh parser per call; keep a [`WikiParser`] around when
/// converting many documents.
pub fn to_html(text: &str) -> String {
    WikiParser::new().transform(text)
}
