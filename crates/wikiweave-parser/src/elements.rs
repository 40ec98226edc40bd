//! Element renderers for inline constructs with their own field syntax.
//!
//! Renderers are pure: they receive the element content (raw and/or already
//! walked) and return an [`Element`] describing the tag, attributes and body.
//! The inline walker owns recursion and per-call state.

pub mod attrs;
pub mod images;
pub mod links;
pub mod phrases;

pub use attrs::Attributes;

use crate::handlers::HandlerRegistry;
use wikiweave_core::{AcronymTable, WikiOptions};

/// Read-only collaborators available to renderers.
#[derive(Clone, Copy)]
pub struct RenderEnv<'a> {
    pub options: &'a WikiOptions,
    pub acronyms: &'a AcronymTable,
    pub handlers: &'a HandlerRegistry,
}

/// A rendered inline element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name; empty for output that is emitted as-is.
    pub tag: &'static str,
    pub attrs: Attributes,
    /// `None` for void elements such as `<img />`.
    pub body: Option<String>,
}

impl Element {
    pub fn new(tag: &'static str, body: impl Into<String>) -> Self {
        Self {
            tag,
            attrs: Attributes::new(),
            body: Some(body.into()),
        }
    }

    pub fn void(tag: &'static str, attrs: Attributes) -> Self {
        Self {
            tag,
            attrs,
            body: None,
        }
    }

    /// Untagged output.
    pub fn raw(html: impl Into<String>) -> Self {
        Self::new("", html)
    }

    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Serialize, appending the author's `§attr§` text to the opening tag.
    pub fn to_html(&self, extra: Option<&str>) -> String {
        if self.tag.is_empty() {
            return self.body.clone().unwrap_or_default();
        }
        let mut open = format!("<{}{}", self.tag, self.attrs.render());
        if let Some(extra) = extra {
            open.push(' ');
            open.push_str(extra);
        }
        match &self.body {
            Some(body) => format!("{}>{}</{}>", open, body, self.tag),
            None => format!("{} />", open),
        }
    }
}
