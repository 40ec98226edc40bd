//! Phrase elements with field syntax: quotes, italics, abbreviations,
//! anchors and inline raw HTML.

use super::attrs::{Attributes, field, protect_name, protect_url, split_fields};
use super::{Element, RenderEnv};

/// `{{content|lang|cite}}`, from walked content.
pub fn quote(walked: &str) -> Element {
    let fields = split_fields(walked);
    let mut attrs = Attributes::new();
    if let Some(lang) = protect_name(field(&fields, 1)) {
        attrs.push("lang", lang);
    }
    attrs.push_nonempty("cite", protect_url(field(&fields, 2).trim()));
    Element::new("q", field(&fields, 0)).with_attrs(attrs)
}

/// `££content|lang££`, from walked content.
pub fn italic(walked: &str) -> Element {
    let fields = split_fields(walked);
    let mut attrs = Attributes::new();
    if let Some(lang) = protect_name(field(&fields, 1)) {
        attrs.push("lang", lang);
    }
    Element::new("i", field(&fields, 0)).with_attrs(attrs)
}

/// `??acronym|title|lang??`; a missing title falls back to the acronym table.
pub fn acronym(raw: &str, env: RenderEnv<'_>) -> Element {
    let fields = split_fields(raw);
    let term = field(&fields, 0);
    let title = match field(&fields, 1) {
        "" => env.acronyms.get(term.trim()).unwrap_or_default(),
        explicit => explicit,
    };

    let mut attrs = Attributes::new();
    attrs.push_nonempty("title", title);
    if let Some(lang) = protect_name(field(&fields, 2)) {
        attrs.push("lang", lang);
    }
    Element::new("abbr", term).with_attrs(attrs)
}

/// `~name~`: an empty `<a id>` target, or `None` for an invalid name.
pub fn anchor(raw: &str) -> Option<Element> {
    let name = protect_name(raw)?;
    let mut attrs = Attributes::new();
    attrs.push("id", name);
    Some(Element::new("a", "").with_attrs(attrs))
}

/// ``` ``markup`` ```: re-admit angle brackets escaped from the source.
pub fn inline_html(raw: &str) -> Element {
    Element::raw(raw.replace("&gt;", ">").replace("&lt;", "<"))
}
