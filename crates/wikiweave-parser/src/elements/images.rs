//! `((url|alt|align|title|caption))` images.

use super::attrs::{Attributes, field, protect_url, split_fields};
use super::{Element, RenderEnv};

/// Alignment code to configured style string.
fn align_style<'a>(code: &str, env: &RenderEnv<'a>) -> Option<&'a str> {
    let options = env.options;
    let style = match code.trim().to_ascii_uppercase().as_str() {
        "G" | "L" => &options.img_style_left,
        "D" | "R" => &options.img_style_right,
        "C" => &options.img_style_center,
        _ => return None,
    };
    (!style.is_empty()).then_some(style.as_str())
}

/// Render an image from its raw field content.
///
/// A non-empty caption wraps the image in `<figure>`, which then carries
/// the alignment style.
pub fn render(raw: &str, env: RenderEnv<'_>) -> Element {
    let fields = split_fields(raw);
    let style = align_style(field(&fields, 2), &env);
    let caption = field(&fields, 4);

    let mut attrs = Attributes::new();
    attrs
        .push("src", protect_url(field(&fields, 0).trim()))
        .push("alt", field(&fields, 1))
        .push_nonempty("title", field(&fields, 3));

    if caption.is_empty() {
        if let Some(style) = style {
            attrs.push("style", style);
        }
        return Element::void("img", attrs);
    }

    let body = format!(
        "{}<figcaption>{}</figcaption>",
        Element::void("img", attrs).to_html(None),
        caption
    );
    let mut figure_attrs = Attributes::new();
    if let Some(style) = style {
        figure_attrs.push("style", style);
    }
    Element::new("figure", body).with_attrs(figure_attrs)
}
