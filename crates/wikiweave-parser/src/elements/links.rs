//! `[label|url|lang|title|noimage]` links.
//!
//! A link whose target looks like an image becomes an `<img>` unless the
//! fifth field is set. `mailto:` targets are hex-encoded when antispam is on.

use super::attrs::{Attributes, field, protect_name, protect_url};
use super::{Element, RenderEnv};
use crate::handlers::LinkTarget;
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

static IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+)\.(gif|jpg|jpeg|png|svg|webp)$").unwrap());

static REMOTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+://").unwrap());

/// Longest bare URL shown verbatim as a label.
const LABEL_MAX_CHARS: usize = 35;

/// Render a link from its walked label and its unescaped `|` fields.
///
/// A single field is both the target and, shortened, the label.
pub fn render(label: &str, fields: &[String], env: RenderEnv<'_>) -> Element {
    let single = fields.len() <= 1;

    let mut link = if single {
        let url = field(fields, 0).trim().to_string();
        LinkTarget {
            content: url.clone(),
            url,
            ..LinkTarget::default()
        }
    } else {
        LinkTarget {
            url: field(fields, 1).trim().to_string(),
            content: label.to_string(),
            lang: protect_name(field(fields, 2)).unwrap_or_default().to_string(),
            title: field(fields, 3).to_string(),
        }
    };
    let no_image = !field(fields, 4).trim().is_empty();

    if let Some(handler) = env.handlers.url_handler(&link.url) {
        link = handler.rewrite(link);
    }
    let auto_label = single && link.content == link.url;
    link.url = link.url.replace("&nbsp;", " ");

    if env.options.active_auto_img && !no_image && IMAGE_URL.is_match(&link.url) {
        return image(&link, single, env);
    }

    if env.options.active_antispam
        && let Some(address) = link.url.strip_prefix("mailto:")
    {
        if auto_label || link.content == link.url {
            link.content = address.to_string();
        }
        link.url = format!("mailto:{}", hex_encode(address));
    }
    if auto_label {
        link.content = truncate_label(&link.content);
    }

    let mut attrs = Attributes::new();
    attrs
        .push("href", protect_url(&link.url))
        .push_nonempty("hreflang", &link.lang)
        .push_nonempty("title", &link.title);
    Element::new("a", link.content).with_attrs(attrs)
}

fn image(link: &LinkTarget, single: bool, env: RenderEnv<'_>) -> Element {
    let mut attrs = Attributes::new();
    attrs
        .push("src", protect_url(&link.url))
        .push("alt", if single { "" } else { link.content.as_str() })
        .push_nonempty("lang", &link.lang)
        .push_nonempty("title", &link.title);

    if !REMOTE_URL.is_match(&link.url)
        && let Some(provider) = env.handlers.image_size_provider()
        && let Some((width, height)) = provider.dimensions(&link.url)
    {
        attrs
            .push("width", width.to_string())
            .push("height", height.to_string());
    }
    Element::void("img", attrs)
}

fn truncate_label(url: &str) -> String {
    if url.chars().count() > LABEL_MAX_CHARS {
        let mut label: String = url.chars().take(LABEL_MAX_CHARS).collect();
        label.push_str("...");
        label
    } else {
        url.to_string()
    }
}

/// `%xx` encoding of every byte, hiding addresses from naive harvesters.
fn hex_encode(text: &str) -> String {
    text.bytes().fold(String::with_capacity(text.len() * 3), |mut out, b| {
        let _ = write!(out, "%{:02x}", b);
        out
    })
}
