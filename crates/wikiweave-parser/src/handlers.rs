//! Extension points: macro handlers, special-URL handlers, the wiki-word
//! handler and the image-size provider.
//!
//! Handlers are registered under namespaced string keys:
//!
//! - `macro:<name>` selects a [`MacroHandler`] by the first word of a macro
//! - `url:<prefix>` selects a [`UrlHandler`] for link targets starting with `prefix`
//! - `wikiword` sets the single [`WikiWordHandler`]
//!
//! Closures with the matching signature implement each trait, so
//! `Handler::macro_fn(|body, _first_line| body.to_uppercase())` works.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use wikiweave_core::{Error, Result};

/// Expands the body of a `///name ... ///` macro into HTML.
pub trait MacroHandler: Send + Sync {
    /// `body` is the macro text without its first line, `first_line` the
    /// first line verbatim (macro name plus arguments).
    fn expand(&self, body: &str, first_line: &str) -> String;
}

impl<F> MacroHandler for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn expand(&self, body: &str, first_line: &str) -> String {
        self(body, first_line)
    }
}

/// Fields of a link as seen by special-URL handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: String,
    pub content: String,
    pub lang: String,
    pub title: String,
}

/// Rewrites links whose target starts with a registered prefix.
pub trait UrlHandler: Send + Sync {
    fn rewrite(&self, link: LinkTarget) -> LinkTarget;
}

impl<F> UrlHandler for F
where
    F: Fn(LinkTarget) -> LinkTarget + Send + Sync,
{
    fn rewrite(&self, link: LinkTarget) -> LinkTarget {
        self(link)
    }
}

/// Renders a recognized wiki word, e.g. into a link to the matching page.
pub trait WikiWordHandler: Send + Sync {
    fn render(&self, word: &str) -> String;
}

impl<F> WikiWordHandler for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, word: &str) -> String {
        self(word)
    }
}

/// Supplies pixel dimensions of local images referenced by links.
pub trait ImageSizeProvider: Send + Sync {
    /// `(width, height)` of the image at `path`, or `None` when unknown.
    fn dimensions(&self, path: &str) -> Option<(u32, u32)>;
}

impl<F> ImageSizeProvider for F
where
    F: Fn(&str) -> Option<(u32, u32)> + Send + Sync,
{
    fn dimensions(&self, path: &str) -> Option<(u32, u32)> {
        self(path)
    }
}

/// Parsed registration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Macro(String),
    Url(String),
    WikiWord,
}

impl FromStr for HandlerKey {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        if key == "wikiword" {
            return Ok(Self::WikiWord);
        }
        if let Some(name) = key.strip_prefix("macro:") {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(Error::invalid_handler(key, "macro name must be a single word"));
            }
            return Ok(Self::Macro(name.to_string()));
        }
        if let Some(prefix) = key.strip_prefix("url:") {
            if prefix.is_empty() {
                return Err(Error::invalid_handler(key, "URL prefix cannot be empty"));
            }
            return Ok(Self::Url(prefix.to_string()));
        }
        Err(Error::invalid_handler(
            key,
            "expected `macro:<name>`, `url:<prefix>` or `wikiword`",
        ))
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Macro(name) => write!(f, "macro:{}", name),
            Self::Url(prefix) => write!(f, "url:{}", prefix),
            Self::WikiWord => f.write_str("wikiword"),
        }
    }
}

/// A handler ready to be registered.
#[derive(Clone)]
pub enum Handler {
    Macro(Arc<dyn MacroHandler>),
    Url(Arc<dyn UrlHandler>),
    WikiWord(Arc<dyn WikiWordHandler>),
}

impl Handler {
    pub fn macro_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self::Macro(Arc::new(f))
    }

    pub fn url_fn<F>(f: F) -> Self
    where
        F: Fn(LinkTarget) -> LinkTarget + Send + Sync + 'static,
    {
        Self::Url(Arc::new(f))
    }

    pub fn wikiword_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::WikiWord(Arc::new(f))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Macro(_) => "macro",
            Self::Url(_) => "url",
            Self::WikiWord(_) => "wikiword",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler::{}", self.kind())
    }
}

/// Every registered extension, owned by the parser.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    macros: HashMap<String, Arc<dyn MacroHandler>>,
    urls: Vec<(String, Arc<dyn UrlHandler>)>,
    wikiword: Option<Arc<dyn WikiWordHandler>>,
    image_sizes: Option<Arc<dyn ImageSizeProvider>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `html` macro, which passes its body through.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .macros
            .insert("html".to_string(), Arc::new(|body: &str, _: &str| body.to_string()));
        registry
    }

    /// Register `handler` under `key`, replacing any previous registration.
    pub fn register(&mut self, key: &str, handler: Handler) -> Result<()> {
        match (key.parse::<HandlerKey>()?, handler) {
            (HandlerKey::Macro(name), Handler::Macro(h)) => {
                self.macros.insert(name, h);
            }
            (HandlerKey::Url(prefix), Handler::Url(h)) => {
                match self.urls.iter_mut().find(|(p, _)| *p == prefix) {
                    Some(entry) => entry.1 = h,
                    None => self.urls.push((prefix, h)),
                }
            }
            (HandlerKey::WikiWord, Handler::WikiWord(h)) => {
                self.wikiword = Some(h);
            }
            (parsed, handler) => {
                return Err(Error::invalid_handler(
                    parsed.to_string(),
                    format!("a {} handler cannot be registered here", handler.kind()),
                ));
            }
        }
        log::debug!("Registered handler {}", key);
        Ok(())
    }

    /// Remove the handler registered under `key`; returns whether one existed.
    pub fn unregister(&mut self, key: &str) -> Result<bool> {
        Ok(match key.parse::<HandlerKey>()? {
            HandlerKey::Macro(name) => self.macros.remove(&name).is_some(),
            HandlerKey::Url(prefix) => {
                let before = self.urls.len();
                self.urls.retain(|(p, _)| *p != prefix);
                before != self.urls.len()
            }
            HandlerKey::WikiWord => self.wikiword.take().is_some(),
        })
    }

    pub fn set_wikiword(&mut self, handler: Arc<dyn WikiWordHandler>) {
        self.wikiword = Some(handler);
    }

    pub fn set_image_size_provider(&mut self, provider: Arc<dyn ImageSizeProvider>) {
        self.image_sizes = Some(provider);
    }

    pub fn macro_handler(&self, name: &str) -> Option<&Arc<dyn MacroHandler>> {
        self.macros.get(name)
    }

    /// First URL handler, in registration order, whose prefix starts `url`.
    pub fn url_handler(&self, url: &str) -> Option<&Arc<dyn UrlHandler>> {
        self.urls
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, h)| h)
    }

    pub fn wikiword_handler(&self) -> Option<&Arc<dyn WikiWordHandler>> {
        self.wikiword.as_ref()
    }

    pub fn image_size_provider(&self) -> Option<&Arc<dyn ImageSizeProvider>> {
        self.image_sizes.as_ref()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut macros: Vec<_> = self.macros.keys().collect();
        macros.sort();
        f.debug_struct("HandlerRegistry")
            .field("macros", &macros)
            .field("urls", &self.urls.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .field("wikiword", &self.wikiword.is_some())
            .field("image_sizes", &self.image_sizes.is_some())
            .finish()
    }
}
