//! Inline walker: pairs delimiters and dispatches element rendering.
//!
//! A line is tokenized on every enabled delimiter. Walking left to right, an
//! opening delimiter whose closer appears later in the same run becomes an
//! element rendered from the tokens in between; otherwise the delimiter is
//! emitted as literal text. Nested content is walked recursively, so the
//! recursion depth is bounded by the number of delimiters in the line.

use crate::context::ParseContext;
use crate::delimiters::{DelimiterTable, InlineKind};
use crate::elements::attrs::{split_fields, split_inline_attr};
use crate::elements::{Element, RenderEnv, images, links, phrases};
use crate::lexer::{Token, source, tokenize};

pub struct InlineWalker<'e> {
    delimiters: &'e DelimiterTable,
    env: RenderEnv<'e>,
}

impl<'e> InlineWalker<'e> {
    pub fn new(delimiters: &'e DelimiterTable, env: RenderEnv<'e>) -> Self {
        Self { delimiters, env }
    }

    /// Walk `text` with every enabled element allowed.
    pub fn walk(&self, text: &str, ctx: &mut ParseContext) -> String {
        self.walk_allowed(text, None, ctx)
    }

    /// Walk `text`, recognizing only elements in `allow` when given.
    pub fn walk_allowed(
        &self,
        text: &str,
        allow: Option<&[InlineKind]>,
        ctx: &mut ParseContext,
    ) -> String {
        let tokens = tokenize(text, self.delimiters.all());
        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        while i < tokens.len() {
            if let Some((kind, len)) = self.match_pair(&tokens[i..], allow) {
                let inner = source(&tokens[i + 1..i + len - 1]);
                if let Some(html) = self.render(kind, &inner, ctx) {
                    out.push_str(&html);
                    i += len;
                    continue;
                }
            }
            out.push_str(&self.delimiters.unescape(tokens[i].as_str()));
            i += 1;
        }
        out
    }

    /// Element opened by the first token and the token count up to and
    /// including its closer.
    fn match_pair(
        &self,
        tokens: &[Token<'_>],
        allow: Option<&[InlineKind]>,
    ) -> Option<(InlineKind, usize)> {
        let Token::Delim(open) = tokens.first()? else {
            return None;
        };
        let kind = self.delimiters.opener(open)?;
        if let Some(allow) = allow
            && !allow.contains(&kind)
        {
            return None;
        }
        let close = Token::Delim(self.delimiters.closer(kind)?);
        let offset = tokens[1..].iter().position(|t| *t == close)?;
        Some((kind, offset + 2))
    }

    /// Split link content on `|` outside nested link-safe elements, so pipes
    /// inside a wrapped image or emphasis stay in their field.
    fn link_fields(&self, content: &str) -> Vec<String> {
        let tokens = tokenize(content, self.delimiters.all());
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut i = 0;
        while i < tokens.len() {
            if let Some((_, len)) = self.match_pair(&tokens[i..], Some(&InlineKind::LINK_SAFE[..])) {
                current.push_str(&source(&tokens[i..i + len]));
                i += len;
                continue;
            }
            match tokens[i] {
                Token::Text(text) => {
                    let mut pieces = split_fields(text).into_iter();
                    if let Some(first) = pieces.next() {
                        current.push_str(&first);
                    }
                    for piece in pieces {
                        fields.push(std::mem::replace(&mut current, piece));
                    }
                }
                Token::Delim(delim) => current.push_str(delim),
            }
            i += 1;
        }
        fields.push(current);
        fields
    }

    /// HTML for a paired element, or `None` when the content is rejected and
    /// the opener should stay literal.
    fn render(&self, kind: InlineKind, inner: &str, ctx: &mut ParseContext) -> Option<String> {
        let (content, extra) = split_inline_attr(inner);
        let raw = self.delimiters.unescape(content);

        let element = match kind {
            InlineKind::Link => {
                let fields = self.link_fields(content);
                let label = match fields.first() {
                    Some(label) => self.walk_allowed(label, Some(&InlineKind::LINK_SAFE[..]), ctx),
                    None => String::new(),
                };
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| self.delimiters.unescape(f).into_owned())
                    .collect();
                links::render(&label, &fields, self.env)
            }
            InlineKind::Image => images::render(&raw, self.env),
            InlineKind::Quote => phrases::quote(&self.walk(content, ctx)),
            InlineKind::Italic => phrases::italic(&self.walk(content, ctx)),
            InlineKind::Acronym => phrases::acronym(&raw, self.env),
            InlineKind::Anchor => phrases::anchor(&raw)?,
            InlineKind::InlineHtml => phrases::inline_html(&raw),
            InlineKind::Note => {
                let body = self.walk(content, ctx);
                Element::raw(ctx.footnotes.add(body))
            }
            InlineKind::Word => match self.env.handlers.wikiword_handler() {
                Some(handler) => Element::raw(handler.render(&raw)),
                None => Element::raw(raw.into_owned()),
            },
            _ => Element::new(kind.tag(), self.walk(content, ctx)),
        };
        Some(element.to_html(extra))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{Handler, HandlerRegistry};
    use wikiweave_core::{AcronymTable, WikiOptions};

    struct Fixture {
        options: WikiOptions,
        delimiters: DelimiterTable,
        acronyms: AcronymTable,
        handlers: HandlerRegistry,
    }

    impl Fixture {
        fn new(options: WikiOptions) -> Self {
            Self {
                delimiters: DelimiterTable::from_options(&options),
                options,
                acronyms: AcronymTable::parse("HTML : HyperText Markup Language"),
                handlers: HandlerRegistry::new(),
            }
        }

        fn walk(&self, text: &str) -> String {
            let mut ctx = ParseContext::new(&self.options.note_prefix);
            self.walk_ctx(text, &mut ctx)
        }

        fn walk_ctx(&self, text: &str, ctx: &mut ParseContext) -> String {
            let env = RenderEnv {
                options: &self.options,
                acronyms: &self.acronyms,
                handlers: &self.handlers,
            };
            InlineWalker::new(&self.delimiters, env).walk(text, ctx)
        }
    }

    fn walk(text: &str) -> String {
        Fixture::new(WikiOptions::default()).walk(text)
    }

    #[test]
    fn test_generic_elements() {
        assert_eq!(walk("''em'' __strong__"), "<em>em</em> <strong>strong</strong>");
        assert_eq!(walk("@@code@@ --del-- ++ins++"), "<code>code</code> <del>del</del> <ins>ins</ins>");
        assert_eq!(walk("\"\"m\"\" ^s^ ,,b,, ;;x;;"), "<mark>m</mark> <sup>s</sup> <sub>b</sub> <span>x</span>");
    }

    #[test]
    fn test_nesting() {
        assert_eq!(walk("__a ''b'' c__"), "<strong>a <em>b</em> c</strong>");
    }

    #[test]
    fn test_unmatched_delimiter_is_literal() {
        assert_eq!(walk("''open"), "''open");
        assert_eq!(walk("a [b c"), "a [b c");
        assert_eq!(walk("''"), "''");
    }

    #[test]
    fn test_escaped_delimiter() {
        assert_eq!(walk(r"\''not''"), "''not''");
        assert_eq!(walk(r"a \[b\] c"), "a [b] c");
    }

    #[test]
    fn test_link_content_restricted() {
        assert_eq!(
            walk("[''x''|http://a]"),
            r#"<a href="http://a"><em>x</em></a>"#
        );
        // notes are not recognized inside link labels
        assert_eq!(walk("[$$n$$|http://a]"), r#"<a href="http://a">$$n$$</a>"#);
    }

    #[test]
    fn test_link_wrapping_image() {
        assert_eq!(
            walk("[((/a.png|A))|http://x]"),
            r#"<a href="http://x"><img src="/a.png" alt="A" /></a>"#
        );
    }

    #[test]
    fn test_link_target_keeps_delimiter_text() {
        assert_eq!(
            walk("[doc|http://example.com/__init__.py]"),
            r#"<a href="http://example.com/__init__.py">doc</a>"#
        );
        assert_eq!(
            walk("[''a|b''|http://x|en]"),
            r#"<a href="http://x" hreflang="en"><em>a|b</em></a>"#
        );
    }

    #[test]
    fn test_invalid_anchor_is_literal() {
        assert_eq!(walk("x ~5 km, ~10 km"), "x ~5 km, ~10 km");
        assert_eq!(walk("~5 km ~top~"), r#"~5 km <a id="top"></a>"#);
    }

    #[test]
    fn test_inline_attribute_suffix() {
        assert_eq!(
            walk(r#"''x§class="c"§''"#),
            r#"<em class="c">x</em>"#
        );
    }

    #[test]
    fn test_acronym_and_anchor() {
        assert_eq!(
            walk("??HTML?? ~top~"),
            r#"<abbr title="HyperText Markup Language">HTML</abbr> <a id="top"></a>"#
        );
    }

    #[test]
    fn test_footnotes_are_collected() {
        let fixture = Fixture::new(WikiOptions::default());
        let mut ctx = ParseContext::new("fn");
        let out = fixture.walk_ctx("a$$one ''x''$$ b$$two$$", &mut ctx);
        assert_eq!(
            out,
            concat!(
                r##"a<sup>[<a href="#fn-1" id="rev-fn-1">1</a>]</sup>"##,
                r##" b<sup>[<a href="#fn-2" id="rev-fn-2">2</a>]</sup>"##
            )
        );
        assert_eq!(ctx.footnotes.len(), 2);
    }

    #[test]
    fn test_inline_html() {
        assert_eq!(walk("``&lt;b&gt;``"), "<b>");
    }

    #[test]
    fn test_disabled_element_is_text() {
        let fixture = Fixture::new(WikiOptions {
            active_em: false,
            ..WikiOptions::default()
        });
        assert_eq!(fixture.walk("''x'' __y__"), "''x'' <strong>y</strong>");
    }

    #[test]
    fn test_wikiword_handler() {
        let mut fixture = Fixture::new(WikiOptions {
            active_wikiwords: true,
            ..WikiOptions::default()
        });
        assert_eq!(fixture.walk("¶¶¶WikiWord¶¶¶"), "WikiWord");

        fixture
            .handlers
            .register(
                "wikiword",
                Handler::wikiword_fn(|w| format!("<a href=\"/{0}\">{0}</a>", w)),
            )
            .unwrap();
        assert_eq!(fixture.walk("¶¶¶WikiWord¶¶¶"), r#"<a href="/WikiWord">WikiWord</a>"#);
    }
}
