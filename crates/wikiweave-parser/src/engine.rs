//! The transformation engine.
//!
//! [`WikiParser`] owns configuration only: options, the acronym table and
//! registered handlers. Tables derived from the options are built lazily on
//! the first `transform` after a change. Every call works on a fresh
//! [`ParseContext`], so one parser can be shared between threads.

use crate::blocks::BlockParser;
use crate::context::ParseContext;
use crate::delimiters::{DelimiterTable, LineTable};
use crate::elements::RenderEnv;
use crate::handlers::{Handler, HandlerRegistry, ImageSizeProvider, LinkTarget};
use crate::inline::InlineWalker;
use crate::{macros, postprocess, preprocess};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use wikiweave_core::{
    AcronymTable, DEFAULT_AUTO_URL_PATTERN, DEFAULT_WORDS_PATTERN, OptionValue, ParserProfile,
    Result, WikiOptions,
};

/// Acronym table compiled into the crate.
const BUNDLED_ACRONYMS: &str = include_str!("../resources/acronyms.txt");

// ============================================================================
// Derived tables
// ============================================================================

#[derive(Debug)]
struct Tables {
    delimiters: DelimiterTable,
    lines: LineTable,
    words: Option<Regex>,
    auto_urls: Option<Regex>,
}

impl Tables {
    fn build(options: &WikiOptions) -> Self {
        Self {
            delimiters: DelimiterTable::from_options(options),
            lines: LineTable::from_options(options),
            words: options.active_wikiwords.then(|| {
                compile_or_default("words_pattern", &options.words_pattern, DEFAULT_WORDS_PATTERN)
            }),
            auto_urls: options.active_auto_urls.then(|| {
                compile_or_default(
                    "auto_url_pattern",
                    &options.auto_url_pattern,
                    DEFAULT_AUTO_URL_PATTERN,
                )
            }),
        }
    }
}

fn compile_or_default(name: &str, pattern: &str, default: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Invalid {} {:?} ({}), using the default", name, pattern, e);
            Regex::new(default).unwrap()
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Wiki markup to HTML converter.
///
/// ```
/// use wikiweave_parser::WikiParser;
///
/// let parser = WikiParser::new();
/// assert_eq!(parser.transform("''hello''"), "<p><em>hello</em></p>");
/// ```
#[derive(Debug, Clone)]
pub struct WikiParser {
    options: WikiOptions,
    acronyms: AcronymTable,
    handlers: HandlerRegistry,
    tables: OnceLock<Arc<Tables>>,
}

impl Default for WikiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiParser {
    /// Parser with default options, the bundled acronyms and the `html` macro.
    pub fn new() -> Self {
        Self::with_options(WikiOptions::default())
    }

    /// Parser with the given options.
    ///
    /// A configured `acronyms_file` is merged over the bundled table; if it
    /// cannot be read the bundled table is used alone.
    pub fn with_options(options: WikiOptions) -> Self {
        let mut parser = Self {
            options,
            acronyms: AcronymTable::parse(BUNDLED_ACRONYMS),
            handlers: HandlerRegistry::with_builtins(),
            tables: OnceLock::new(),
        };
        parser.load_configured_acronyms();
        parser
    }

    pub fn with_profile(profile: ParserProfile) -> Self {
        Self::with_options(profile.create_options())
    }

    // ------------------------------------------------------------------------
    // Options
    // ------------------------------------------------------------------------

    pub fn options(&self) -> &WikiOptions {
        &self.options
    }

    pub fn get_option(&self, name: &str) -> Option<OptionValue> {
        self.options.get_option(name)
    }

    /// Change one option. Derived tables are rebuilt on the next transform.
    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        self.options.set_option(name, value)?;
        self.options_changed(name);
        Ok(())
    }

    /// Change several options atomically.
    pub fn set_options<I, K, V>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        let options: Vec<(K, V)> = options.into_iter().collect();
        let names: Vec<String> = options.iter().map(|(k, _)| k.as_ref().to_string()).collect();
        self.options.set_options(options)?;
        for name in &names {
            self.options_changed(name);
        }
        Ok(())
    }

    /// Replace the whole option set.
    pub fn replace_options(&mut self, options: WikiOptions) {
        let acronyms_changed = options.acronyms_file != self.options.acronyms_file;
        self.options = options;
        self.tables = OnceLock::new();
        if acronyms_changed {
            self.load_configured_acronyms();
        }
    }

    fn options_changed(&mut self, name: &str) {
        self.tables = OnceLock::new();
        if name == "acronyms_file" {
            self.load_configured_acronyms();
        }
    }

    // ------------------------------------------------------------------------
    // Acronyms
    // ------------------------------------------------------------------------

    pub fn acronyms(&self) -> &AcronymTable {
        &self.acronyms
    }

    /// Merge a `term:expansion` file into the acronym table.
    pub fn load_acronyms(&mut self, path: &Path) -> Result<usize> {
        let count = self.acronyms.merge_file(path)?;
        log::debug!("Loaded {} acronyms from {}", count, path.display());
        Ok(count)
    }

    /// Merge `term:expansion` text into the acronym table.
    pub fn add_acronyms(&mut self, content: &str) -> usize {
        self.acronyms.merge_str(content)
    }

    fn load_configured_acronyms(&mut self) {
        if self.options.acronyms_file.is_empty() {
            return;
        }
        let path = self.options.acronyms_file.clone();
        if let Err(e) = self.load_acronyms(Path::new(&path)) {
            log::warn!("Could not load acronyms from {}: {}", path, e);
        }
    }

    // ------------------------------------------------------------------------
    // Extension points
    // ------------------------------------------------------------------------

    /// Register a handler under `macro:<name>`, `url:<prefix>` or `wikiword`.
    pub fn register_handler(&mut self, key: &str, handler: Handler) -> Result<()> {
        self.handlers.register(key, handler)
    }

    pub fn unregister_handler(&mut self, key: &str) -> Result<bool> {
        self.handlers.unregister(key)
    }

    /// Register a macro expansion under `name`.
    pub fn register_macro<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.register_handler(&format!("macro:{}", name), Handler::macro_fn(f))
    }

    /// Register a rewrite for link targets starting with `prefix`.
    pub fn register_url_handler<F>(&mut self, prefix: &str, f: F) -> Result<()>
    where
        F: Fn(LinkTarget) -> LinkTarget + Send + Sync + 'static,
    {
        self.register_handler(&format!("url:{}", prefix), Handler::url_fn(f))
    }

    pub fn set_wikiword_handler<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.handlers.set_wikiword(Arc::new(f));
    }

    pub fn set_image_size_provider<P>(&mut self, provider: P)
    where
        P: ImageSizeProvider + 'static,
    {
        self.handlers.set_image_size_provider(Arc::new(provider));
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    // ------------------------------------------------------------------------
    // Transformation
    // ------------------------------------------------------------------------

    fn tables(&self) -> &Tables {
        self.tables
            .get_or_init(|| Arc::new(Tables::build(&self.options)))
    }

    /// Convert wiki markup into an HTML fragment. Never fails.
    pub fn transform(&self, text: &str) -> String {
        let options = &self.options;
        let tables = self.tables();
        let mut ctx = ParseContext::new(&options.note_prefix);

        let mut text = text.replace('\r', "");
        if options.active_macros {
            text = macros::extract(&text, &mut ctx.macros);
        }
        if options.active_setext_title && options.active_title {
            text = preprocess::setext_titles(&text);
        }
        if let Some(words) = &tables.words {
            text = preprocess::wrap_wiki_words(&text, words);
        }
        if let Some(urls) = &tables.auto_urls {
            text = preprocess::auto_urls(&text, urls, &tables.delimiters, options.active_urls);
        }

        let env = RenderEnv {
            options,
            acronyms: &self.acronyms,
            handlers: &self.handlers,
        };
        let walker = InlineWalker::new(&tables.delimiters, env);
        let mut html = BlockParser::new(&tables.lines, &walker, options).parse(&text, &mut ctx);

        if options.active_br {
            html = postprocess::line_breaks(&html);
        }
        html = postprocess::collapse_whitespace(&html);
        if options.active_br {
            html = postprocess::unescape_line_breaks(&html);
        }
        if options.active_wikiwords {
            html = postprocess::strip_word_markers(&html);
        }
        if options.active_macros {
            html = macros::reinsert(&html, &ctx.macros, &self.handlers);
        }
        if options.active_auto_br {
            html = postprocess::auto_br(&html);
        }
        html = postprocess::unwrap_figures(&html);

        let notes = ctx
            .footnotes
            .render(&options.note_str, &options.note_str_single);
        if !notes.is_empty() {
            html.push('\n');
            html.push_str(&notes);
        }

        log::debug!(
            "Transformed {} lines ({} macros, {} footnotes) into {} bytes",
            text.lines().count(),
            ctx.macros.len(),
            ctx.footnotes.len(),
            html.len()
        );
        html
    }
}
