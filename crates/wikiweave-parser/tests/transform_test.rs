//! End-to-end tests for `WikiParser::transform`

use std::io::Write;
use wikiweave_parser::postprocess::unwrap_figures;
use wikiweave_parser::{LinkTarget, ParserProfile, WikiParser};

fn flat(html: &str) -> String {
    html.replace('\n', "")
}

// ============================================================================
// Totality and escaping
// ============================================================================

#[test]
fn test_transform_never_fails_on_pathological_input() {
    let parser = WikiParser::new();
    let inputs = [
        "",
        "\n\n\n",
        "''",
        "''''''",
        "[[[[]]]]",
        "((((",
        "))",
        "$$$$$$",
        "@@ __ -- ++ ?? ~ ^ ,, ££ ;; \"\" ``",
        "[|||||]",
        "((|||||))",
        "??|??",
        "~~",
        "\\",
        "\\\\\\",
        "§§§§",
        "x§§§§",
        "''§§''",
        "*\n**\n***\n****\n*****",
        "#*#*#*\n*",
        "|\n|\n|\n|",
        "|a\n|b\n|c",
        "///\n///",
        "///",
        "øøø",
        "øøø##########MACRO#9#",
        "!!!!!!!!!!",
        "----\n=====\n-----",
        "= \n: \n= ",
        " \n \n ",
        "> \n>\n;:",
        "%%%\\%%%%%%",
        "¶¶¶¶¶¶",
        "\r\n\r\n",
    ];
    for input in inputs {
        let _ = parser.transform(input);
    }

    let mut everything = WikiParser::new();
    everything
        .set_options([
            ("active_auto_urls", true),
            ("active_auto_br", true),
            ("active_wikiwords", true),
            ("active_setext_title", true),
        ])
        .unwrap();
    for input in inputs {
        let _ = everything.transform(input);
    }
}

#[test]
fn test_deep_list_does_not_overflow() {
    let parser = WikiParser::new();
    let text: String = (1..=200)
        .map(|depth| format!("{} item\n", "*".repeat(depth)))
        .collect();
    let html = parser.transform(&text);
    assert_eq!(html.matches("<ul>").count(), 200);
    assert_eq!(html.matches("</ul>").count(), 200);
}

#[test]
fn test_escaped_delimiter_stays_literal() {
    let parser = WikiParser::new();
    assert_eq!(
        parser.transform(r"\''not emphasis''"),
        "<p>''not emphasis''</p>"
    );
}

#[test]
fn test_paired_emphasis() {
    let parser = WikiParser::new();
    assert_eq!(parser.transform("''hello''"), "<p><em>hello</em></p>");
}

#[test]
fn test_source_html_is_escaped() {
    let parser = WikiParser::new();
    insta::assert_snapshot!(
        parser.transform("<b>bold</b> & co"),
        @"<p>&lt;b&gt;bold&lt;/b&gt; &amp; co</p>"
    );
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_list_nesting() {
    let parser = WikiParser::new();
    assert_eq!(
        flat(&parser.transform("* a\n** b\n* c")),
        "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"
    );
}

#[test]
fn test_list_jump_is_demoted() {
    let parser = WikiParser::new();
    let html = flat(&parser.transform("* a\n*** b"));
    assert!(html.starts_with("<ul><li>a</li></ul>"));
    assert!(html.contains("<p><br />*** b</p>"));
    assert_eq!(html.matches("<ul>").count(), 1);
}

#[test]
fn test_document_structure() {
    let parser = WikiParser::new();
    let html = flat(&parser.transform("!!! Title\n\nintro\n\n----\n\n> quoted"));
    assert_eq!(
        html,
        "<h3>Title</h3><p>intro</p><hr /><blockquote><p>quoted</p></blockquote>"
    );
}

#[test]
fn test_setext_titles_when_enabled() {
    let text = "Title\n=====\n\nbody";
    let mut parser = WikiParser::new();
    assert!(!parser.transform(text).contains("<h3>"));

    parser.set_option("active_setext_title", true).unwrap();
    assert_eq!(flat(&parser.transform(text)), "<h3>Title</h3><p>body</p>");
}

// ============================================================================
// Links and images
// ============================================================================

#[test]
fn test_link_to_image_is_rendered_as_image() {
    let parser = WikiParser::new();
    assert_eq!(
        parser.transform("[alt|photo.png]"),
        r#"<p><img src="photo.png" alt="alt" /></p>"#
    );
    assert_eq!(
        parser.transform("[alt|photo.png|||1]"),
        r#"<p><a href="photo.png">alt</a></p>"#
    );
}

#[test]
fn test_auto_image_can_be_disabled() {
    let mut parser = WikiParser::new();
    parser.set_option("active_auto_img", false).unwrap();
    assert_eq!(
        parser.transform("[alt|photo.png]"),
        r#"<p><a href="photo.png">alt</a></p>"#
    );
}

#[test]
fn test_image_size_provider() {
    let mut parser = WikiParser::new();
    parser.set_image_size_provider(|path: &str| (path == "/img/a.png").then_some((10u32, 20u32)));
    assert_eq!(
        parser.transform("[alt|/img/a.png]"),
        r#"<p><img src="/img/a.png" alt="alt" width="10" height="20" /></p>"#
    );
    // remote images are never measured
    assert_eq!(
        parser.transform("[alt|http://x.org/img/a.png]"),
        r#"<p><img src="http://x.org/img/a.png" alt="alt" /></p>"#
    );
}

#[test]
fn test_mailto_is_obfuscated() {
    let parser = WikiParser::new();
    assert_eq!(
        parser.transform("[mailto:a@b.c]"),
        r#"<p><a href="mailto:%61%40%62%2e%63">a@b.c</a></p>"#
    );
}

#[test]
fn test_long_mailto_label_drops_scheme_before_truncation() {
    let parser = WikiParser::new();
    let html = parser.transform("[mailto:averyveryverylongaddress@example.com]");
    assert!(html.contains(">averyveryverylongaddress@example.co...</a>"), "{}", html);
    assert!(!html.contains(">mailto:"), "{}", html);
}

#[test]
fn test_link_target_is_not_inline_markup() {
    let parser = WikiParser::new();
    assert_eq!(
        parser.transform("[doc|http://example.com/__init__.py]"),
        r#"<p><a href="http://example.com/__init__.py">doc</a></p>"#
    );
    assert_eq!(
        parser.transform("[__doc__|http://example.com/a--b--c]"),
        r#"<p><a href="http://example.com/a--b--c"><strong>doc</strong></a></p>"#
    );
}

#[test]
fn test_invalid_anchor_keeps_text() {
    let parser = WikiParser::new();
    assert_eq!(parser.transform("x ~5 km, ~10 km"), "<p>x ~5 km, ~10 km</p>");
    assert_eq!(
        parser.transform("go ~not valid~ ~top~"),
        r#"<p>go ~not valid~ <a id="top"></a></p>"#
    );
}

#[test]
fn test_url_handler_rewrites_links() {
    let mut parser = WikiParser::new();
    parser
        .register_url_handler("wiki:", |target: LinkTarget| LinkTarget {
            url: format!("/wiki/{}", target.url.trim_start_matches("wiki:")),
            ..target
        })
        .unwrap();
    assert_eq!(
        parser.transform("[Page|wiki:Home]"),
        r#"<p><a href="/wiki/Home">Page</a></p>"#
    );
}

#[test]
fn test_auto_urls() {
    let mut parser = WikiParser::new();
    parser.set_option("active_auto_urls", true).unwrap();
    insta::assert_snapshot!(
        parser.transform("see http://example.com/a and [x|http://example.com/b]"),
        @r#"<p>see <a href="http://example.com/a">http://example.com/a</a> and <a href="http://example.com/b">x</a></p>"#
    );
}

#[test]
fn test_auto_urls_after_unclosed_bracket() {
    let mut parser = WikiParser::new();
    parser.set_option("active_auto_urls", true).unwrap();
    let html = parser.transform("array[0 is first\n\nsee http://example.com");
    assert!(
        html.contains(r#"<a href="http://example.com">http://example.com</a>"#),
        "{}",
        html
    );
    assert!(html.starts_with("<p>array[0 is first</p>"), "{}", html);
}

// ============================================================================
// Footnotes, acronyms, wiki words
// ============================================================================

#[test]
fn test_footnotes_are_numbered_and_cross_linked() {
    let parser = WikiParser::new();
    let html = parser.transform("a$$first$$ b$$second$$");

    for n in 1..=2 {
        let marker = format!(
            r##"<sup>[<a href="#wiki-footnote-{n}" id="rev-wiki-footnote-{n}">{n}</a>]</sup>"##
        );
        let entry = format!(
            r##"<p>[<a href="#rev-wiki-footnote-{n}" id="wiki-footnote-{n}">{n}</a>]"##
        );
        assert_eq!(html.matches(&marker).count(), 1, "{}", html);
        assert_eq!(html.matches(&entry).count(), 1, "{}", html);
    }
    assert!(html.contains("<h4>Notes</h4>"));
    assert!(html.contains("] first</p>"));
    assert!(html.contains("] second</p>"));
}

#[test]
fn test_single_footnote_uses_singular_template() {
    let parser = WikiParser::new();
    let html = parser.transform("text$$only$$");
    assert!(html.contains("<h4>Note</h4>"));
    assert!(!parser.transform("text").contains("footnotes"));
}

#[test]
fn test_bundled_acronyms() {
    let parser = WikiParser::new();
    assert_eq!(
        parser.transform("??HTML??"),
        r#"<p><abbr title="HyperText Markup Language">HTML</abbr></p>"#
    );
    assert_eq!(
        parser.transform("??XYZ|Custom??"),
        r#"<p><abbr title="Custom">XYZ</abbr></p>"#
    );
}

#[test]
fn test_acronyms_file_option() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "WW : Wiki Weave").unwrap();

    let mut parser = WikiParser::new();
    parser
        .set_option("acronyms_file", file.path().to_str().unwrap())
        .unwrap();
    assert_eq!(
        parser.transform("??WW??"),
        r#"<p><abbr title="Wiki Weave">WW</abbr></p>"#
    );
    // the bundled entries are still there
    assert!(parser.acronyms().get("CSS").is_some());
}

#[test]
fn test_wiki_words() {
    let mut parser = WikiParser::new();
    parser.set_option("active_wikiwords", true).unwrap();
    assert_eq!(parser.transform("see WikiWord"), "<p>see WikiWord</p>");

    parser.set_wikiword_handler(|word| format!(r#"<a href="/w/{0}">{0}</a>"#, word));
    assert_eq!(
        parser.transform("see WikiWord"),
        r#"<p>see <a href="/w/WikiWord">WikiWord</a></p>"#
    );
}

// ============================================================================
// Macros
// ============================================================================

#[test]
fn test_unregistered_macro_falls_back_to_pre() {
    let parser = WikiParser::new();
    assert_eq!(
        parser.transform("///graph\na<b\n///"),
        "<pre>graph\na&lt;b\n</pre>"
    );
}

#[test]
fn test_registered_macro_replaces_fallback() {
    let mut parser = WikiParser::new();
    parser
        .register_macro("graph", |body, first_line| {
            format!("<div data-line=\"{}\">{}</div>", first_line, body.trim())
        })
        .unwrap();
    assert_eq!(
        parser.transform("///graph\na<b\n///"),
        r#"<div data-line="graph">a<b</div>"#
    );

    parser.unregister_handler("macro:graph").unwrap();
    assert!(parser.transform("///graph\na<b\n///").starts_with("<pre>"));
}

#[test]
fn test_html_macro_between_paragraphs() {
    let parser = WikiParser::new();
    assert_eq!(
        flat(&parser.transform("before\n\n///html\n<hr class=\"x\"/>\n///\n\nafter")),
        r#"<p>before</p><hr class="x"/><p>after</p>"#
    );
}

#[test]
fn test_macros_disabled() {
    let mut parser = WikiParser::new();
    parser.set_option("active_macros", false).unwrap();
    assert!(!parser.transform("///html\n<b>x</b>\n///").contains("<b>"));
}

// ============================================================================
// Post-processing
// ============================================================================

#[test]
fn test_figure_unwrap_reaches_fixed_point() {
    let parser = WikiParser::new();
    let html = parser.transform("before ((/a.png|A|C||Caption)) after");
    assert!(html.contains("<figure"));
    assert!(!html.contains("<p><figure"));
    assert_eq!(unwrap_figures(&html), html);
}

#[test]
fn test_auto_br() {
    let mut parser = WikiParser::new();
    parser.set_option("active_auto_br", true).unwrap();
    assert_eq!(parser.transform("a\nb"), "<p>a<br />\nb</p>");
}

// ============================================================================
// Profiles
// ============================================================================

#[test]
fn test_comment_profiles() {
    let comments = WikiParser::with_profile(ParserProfile::Comments);
    assert_eq!(comments.transform("!!! x"), "<p>!!! x</p>");
    assert!(comments.transform("''x''").contains("<em>x</em>"));

    let simple = WikiParser::with_profile(ParserProfile::SimpleComments);
    assert_eq!(simple.transform("''x''"), "<p>''x''</p>");
    assert!(simple.transform("go http://a.org").contains(r#"href="http://a.org""#));
}

#[test]
fn test_parser_is_shareable_across_threads() {
    let parser = std::sync::Arc::new(WikiParser::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.transform(&format!("n$$note {}$$", i)))
        })
        .collect();
    for handle in handles {
        let html = handle.join().unwrap();
        // each call numbers its notes from one
        assert!(html.contains("wiki-footnote-1"));
        assert!(!html.contains("wiki-footnote-2"));
    }
}
